use actix_web::{web, HttpResponse};

use crate::{auth::{ensure, Capability, IsOwner}, db_interaction::{delete_item, DeleteError}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Deleting item",
    skip(owner, pool),
    fields(user_id = %owner.0.id)
)]
pub async fn delete_menu_item(
    owner: IsOwner,
    pool: web::Data<DbPool>,
    path: web::Path<(i32, i32)>
) -> Result<HttpResponse, ApiError> {
    let (restaurant_id, item_id) = path.into_inner();
    ensure(&pool, &owner.0, Capability::OwnerOfItem{ restaurant_id, item_id }).await?;

    let conn = get_pooled_connection(&pool).await?;
    delete_item(conn, item_id, restaurant_id)
        .await
        .map_err(|e| match e {
            DeleteError::StillReferenced(_) => ApiError::field("id", "Item is used by an existing order"),
            DeleteError::UnexpectedError(e) => ApiError::Internal(e)
        })?;

    Ok(HttpResponse::NoContent().finish())
}
