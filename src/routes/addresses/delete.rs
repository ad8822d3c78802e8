use actix_web::{web, HttpResponse};

use crate::{auth::{ensure, Authenticated, Capability}, db_interaction::{delete_address, DeleteError}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Deleting address",
    skip(user, pool),
    fields(user_id = %user.0.id)
)]
pub async fn delete_address_by_id(
    user: Authenticated,
    pool: web::Data<DbPool>,
    path: web::Path<i32>
) -> Result<HttpResponse, ApiError> {
    let address_id = path.into_inner();
    ensure(&pool, &user.0, Capability::UserOfAddress(address_id)).await?;

    let conn = get_pooled_connection(&pool).await?;
    delete_address(conn, address_id, user.0.id)
        .await
        .map_err(|e| match e {
            DeleteError::StillReferenced(_) => ApiError::field("id", "Address is used by an existing order"),
            DeleteError::UnexpectedError(e) => ApiError::Internal(e)
        })?;

    Ok(HttpResponse::NoContent().finish())
}
