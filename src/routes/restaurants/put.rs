use actix_web::{web, HttpResponse};

use crate::{auth::{ensure, Capability, IsOwner}, db_interaction::update_restaurant, error::ApiError, models::RestaurantChanges, routes::payloads::RestaurantEnvelope, utils::{get_pooled_connection, DbPool}};

use super::RestaurantForm;

#[tracing::instrument(
    "Updating restaurant",
    skip(owner, pool, form),
    fields(user_id = %owner.0.id)
)]
pub async fn put_restaurant(
    owner: IsOwner,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    form: web::Json<RestaurantForm>
) -> Result<HttpResponse, ApiError> {
    let (name, description) = form.into_inner().checked()?;
    let restaurant_id = path.into_inner();
    ensure(&pool, &owner.0, Capability::OwnerOfRestaurant(restaurant_id)).await?;

    let conn = get_pooled_connection(&pool).await?;
    let restaurant = update_restaurant(conn, restaurant_id, owner.0.id, RestaurantChanges{
        name,
        description
    })
    .await?
    .ok_or(ApiError::NotFound("Restaurant"))?;

    Ok(HttpResponse::Ok().json(RestaurantEnvelope{ restaurant }))
}
