use actix_web::{web, HttpResponse};

use crate::{auth::IsOwner, db_interaction::{get_restaurant_with_items, list_restaurants, list_restaurants_for_owner}, error::ApiError, routes::payloads::{RestaurantDetails, RestaurantsEnvelope}, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Getting list of restaurants",
    skip_all
)]
pub async fn get_restaurants(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let restaurants = list_restaurants(conn).await?;

    Ok(HttpResponse::Ok().json(RestaurantsEnvelope{ restaurants }))
}

#[tracing::instrument(
    "Getting restaurants of owner",
    skip_all,
    fields(user_id = %owner.0.id)
)]
pub async fn get_my_restaurants(
    owner: IsOwner,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let restaurants = list_restaurants_for_owner(conn, owner.0.id).await?;

    Ok(HttpResponse::Ok().json(RestaurantsEnvelope{ restaurants }))
}

#[tracing::instrument(
    "Getting restaurant with menu",
    skip(pool)
)]
pub async fn get_restaurant(
    pool: web::Data<DbPool>,
    path: web::Path<i32>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;

    match get_restaurant_with_items(conn, path.into_inner()).await? {
        Some((restaurant, items)) => Ok(HttpResponse::Ok().json(RestaurantDetails{ restaurant, items })),
        None => Err(ApiError::NotFound("Restaurant"))
    }
}
