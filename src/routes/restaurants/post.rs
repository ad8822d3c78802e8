use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::{auth::IsOwner, db_interaction::create_restaurant, domain::{form_value::{filled, text_or_absent}, FormValue}, error::{check_form, ApiError}, models::NewRestaurant, routes::payloads::RestaurantEnvelope, utils::{get_pooled_connection, DbPool}};

// Body of both the create and the update restaurant requests
#[derive(Deserialize, Debug, Validate)]
pub struct RestaurantForm{
    #[serde(default)]
    #[validate(custom(function = "filled", message = "Name is required"))]
    pub name: FormValue<String>,
    #[serde(default)]
    #[validate(custom(function = "text_or_absent", message = "Description must be a string"))]
    pub description: FormValue<String>
}

impl RestaurantForm {
    pub(crate) fn checked(self) -> Result<(String, Option<String>), ApiError> {
        check_form(&self, Vec::new())?;

        Ok((self.name.checked("name")?, self.description.into_value()))
    }
}

#[tracing::instrument(
    "Posting restaurant",
    skip_all,
    fields(user_id = %owner.0.id)
)]
pub async fn post_restaurant(
    owner: IsOwner,
    pool: web::Data<DbPool>,
    form: web::Json<RestaurantForm>
) -> Result<HttpResponse, ApiError> {
    let (name, description) = form.into_inner().checked()?;

    let conn = get_pooled_connection(&pool).await?;
    let restaurant = create_restaurant(conn, NewRestaurant{
        owner_id: owner.0.id,
        name,
        description
    })
    .await?;

    Ok(HttpResponse::Created().json(RestaurantEnvelope{ restaurant }))
}
