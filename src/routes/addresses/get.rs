use actix_web::{web, HttpResponse};

use crate::{auth::Authenticated, db_interaction::list_addresses_for_user, error::ApiError, routes::payloads::AddressesEnvelope, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Getting addresses of user",
    skip_all,
    fields(user_id = %user.0.id)
)]
pub async fn get_addresses(
    user: Authenticated,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let addresses = list_addresses_for_user(conn, user.0.id).await?;

    Ok(HttpResponse::Ok().json(AddressesEnvelope{ addresses }))
}
