use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::{auth::Authenticated, db_interaction::create_address, domain::{form_value::filled, FormValue}, error::{check_form, ApiError}, models::NewAddress, routes::payloads::AddressEnvelope, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug, Validate)]
pub struct AddressForm{
    #[serde(default)]
    #[validate(custom(function = "filled", message = "Label is required"))]
    pub label: FormValue<String>,
    #[serde(default)]
    #[validate(custom(function = "filled", message = "Street is required"))]
    pub street: FormValue<String>,
    #[serde(default)]
    #[validate(custom(function = "filled", message = "City is required"))]
    pub city: FormValue<String>,
    #[serde(default)]
    #[validate(custom(function = "filled", message = "Postal code is required"))]
    pub postal_code: FormValue<String>
}

impl AddressForm {
    fn into_new_address(self, user_id: i32) -> Result<NewAddress, ApiError> {
        check_form(&self, Vec::new())?;

        Ok(NewAddress{
            user_id,
            label: self.label.checked("label")?,
            street: self.street.checked("street")?,
            city: self.city.checked("city")?,
            postal_code: self.postal_code.checked("postal_code")?
        })
    }
}

#[tracing::instrument(
    "Posting address",
    skip_all,
    fields(user_id = %user.0.id)
)]
pub async fn post_address(
    user: Authenticated,
    pool: web::Data<DbPool>,
    form: web::Json<AddressForm>
) -> Result<HttpResponse, ApiError> {
    let new_address = form.into_inner().into_new_address(user.0.id)?;

    let conn = get_pooled_connection(&pool).await?;
    let address = create_address(conn, new_address).await?;

    Ok(HttpResponse::Created().json(AddressEnvelope{ address }))
}
