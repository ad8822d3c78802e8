use actix_web::{web, HttpResponse};

use crate::{auth::{ensure, Capability, IsOwner}, db_interaction::update_item, error::ApiError, models::ItemChanges, routes::payloads::ItemEnvelope, utils::{get_pooled_connection, DbPool}};

use super::ItemForm;

#[tracing::instrument(
    "Updating item",
    skip(owner, pool, form),
    fields(user_id = %owner.0.id)
)]
pub async fn update_menu_item(
    owner: IsOwner,
    pool: web::Data<DbPool>,
    path: web::Path<(i32, i32)>,
    form: web::Json<ItemForm>
) -> Result<HttpResponse, ApiError> {
    let (name, description, price) = form.into_inner().checked()?;
    let (restaurant_id, item_id) = path.into_inner();
    ensure(&pool, &owner.0, Capability::OwnerOfItem{ restaurant_id, item_id }).await?;

    let conn = get_pooled_connection(&pool).await?;
    let item = update_item(conn, item_id, restaurant_id, ItemChanges{
        name,
        description,
        price
    })
    .await?
    .ok_or(ApiError::NotFound("Item"))?;

    Ok(HttpResponse::Ok().json(ItemEnvelope{ item }))
}
