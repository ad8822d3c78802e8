use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::{auth::{ensure, Capability, IsOwner}, db_interaction::create_item, domain::{form_value::{filled, positive_int, text_or_absent}, FormValue}, error::{check_form, ApiError}, models::NewItem, routes::payloads::ItemEnvelope, utils::{get_pooled_connection, DbPool}};

pub(crate) const PRICE_MESSAGE: &str = "Price must be a positive integer (cents)";

// Body of both the create and the update item requests
#[derive(Deserialize, Debug, Validate)]
pub struct ItemForm{
    #[serde(default)]
    #[validate(custom(function = "filled", message = "Name is required"))]
    pub name: FormValue<String>,
    #[serde(default)]
    #[validate(custom(function = "text_or_absent", message = "Description must be a string"))]
    pub description: FormValue<String>,
    #[serde(default)]
    #[validate(custom(function = "positive_int", message = "Price must be a positive integer (cents)"))]
    pub price: FormValue<i64>
}

impl ItemForm {
    pub(crate) fn checked(self) -> Result<(String, Option<String>, i32), ApiError> {
        check_form(&self, Vec::new())?;
        let price = self.price
            .value()
            .and_then(|price| i32::try_from(*price).ok())
            .ok_or_else(|| ApiError::field("price", PRICE_MESSAGE))?;

        Ok((self.name.checked("name")?, self.description.into_value(), price))
    }
}

#[tracing::instrument(
    "Posting item",
    skip(owner, pool, form),
    fields(user_id = %owner.0.id)
)]
pub async fn post_item(
    owner: IsOwner,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    form: web::Json<ItemForm>
) -> Result<HttpResponse, ApiError> {
    let (name, description, price) = form.into_inner().checked()?;
    let restaurant_id = path.into_inner();
    ensure(&pool, &owner.0, Capability::OwnerOfRestaurant(restaurant_id)).await?;

    let conn = get_pooled_connection(&pool).await?;
    let item = create_item(conn, NewItem{
        restaurant_id,
        name,
        description,
        price
    })
    .await?;

    Ok(HttpResponse::Created().json(ItemEnvelope{ item }))
}
