use actix_web::{web, HttpResponse};

use crate::{auth::IsCustomer, db_interaction::{get_order_for_user, list_orders_for_user}, error::ApiError, routes::payloads::OrdersEnvelope, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Getting list of orders",
    skip_all,
    fields(user_id = %customer.0.id)
)]
pub async fn get_orders(
    customer: IsCustomer,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let orders = list_orders_for_user(conn, customer.0.id).await?;

    Ok(HttpResponse::Ok().json(OrdersEnvelope{ orders }))
}

#[tracing::instrument(
    "Getting order with its items",
    skip(customer, pool),
    fields(user_id = %customer.0.id)
)]
pub async fn get_order(
    customer: IsCustomer,
    pool: web::Data<DbPool>,
    path: web::Path<i32>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;

    match get_order_for_user(conn, path.into_inner(), customer.0.id).await? {
        Some(placed) => Ok(HttpResponse::Ok().json(placed)),
        None => Err(ApiError::NotFound("Order"))
    }
}
