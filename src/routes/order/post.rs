use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{auth::IsCustomer, db_interaction::{place_verified_order, CreateOrderError}, domain::{form_value::{non_empty, positive_int}, FormValue}, error::{check_form, ApiError, FieldError}, models::OrderLine, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default)]
pub struct OrderLineForm{
    #[serde(default)]
    pub item_id: FormValue<i64>,
    #[serde(default)]
    pub quantity: FormValue<i64>,
    #[serde(default)]
    pub price_snapshot: FormValue<i64>
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct OrderForm{
    #[serde(default)]
    #[validate(custom(function = "positive_int", message = "address_id is required"))]
    pub address_id: FormValue<i64>,
    #[serde(default)]
    #[validate(custom(function = "non_empty", message = "items is required and must not be empty"))]
    pub items: FormValue<Vec<OrderLineForm>>
}

fn positive_i32(value: &FormValue<i64>) -> Option<i32> {
    value.value()
        .and_then(|v| i32::try_from(*v).ok())
        .filter(|v| *v > 0)
}

impl OrderForm {
    // Every line is checked; failures are reported as `items[i].<field>`
    pub(crate) fn checked(self) -> Result<(i32, Vec<OrderLine>), ApiError> {
        let form_lines = self.items.value().map(Vec::as_slice).unwrap_or_default();
        let mut problems = Vec::new();
        let mut lines = Vec::with_capacity(form_lines.len());

        for (index, line) in form_lines.iter().enumerate() {
            let item_id = positive_i32(&line.item_id);
            let quantity = positive_i32(&line.quantity);
            let price_snapshot = positive_i32(&line.price_snapshot);

            if item_id.is_none() {
                problems.push(FieldError::new(format!("items[{}].item_id", index), "item_id must be an integer"));
            }
            if quantity.is_none() {
                problems.push(FieldError::new(format!("items[{}].quantity", index), "quantity must be > 0"));
            }
            if price_snapshot.is_none() {
                problems.push(FieldError::new(format!("items[{}].price_snapshot", index), "price_snapshot must be > 0"));
            }

            if let (Some(item_id), Some(quantity), Some(price_snapshot)) = (item_id, quantity, price_snapshot) {
                lines.push(OrderLine{ item_id, quantity, price_snapshot });
            }
        }

        check_form(&self, problems)?;
        let address_id = positive_i32(&self.address_id)
            .ok_or_else(|| ApiError::field("address_id", "address_id is required"))?;

        Ok((address_id, lines))
    }
}

#[tracing::instrument(
    "Posting order",
    skip_all,
    fields(user_id = %customer.0.id)
)]
pub async fn post_order(
    customer: IsCustomer,
    pool: web::Data<DbPool>,
    form: web::Json<OrderForm>
) -> Result<HttpResponse, ApiError> {
    let (address_id, lines) = form.into_inner().checked()?;

    let conn = get_pooled_connection(&pool).await?;
    let placed = place_verified_order(conn, customer.0.id, address_id, lines)
        .await
        .map_err(|e| match e {
            CreateOrderError::AddressNotFound => ApiError::NotFound("Address"),
            CreateOrderError::InvalidLines(problems) => ApiError::Validation(problems),
            e => ApiError::Internal(anyhow::Error::new(e))
        })?;

    tracing::info!(order_id = placed.order.id, "Order placed");
    Ok(HttpResponse::Created().json(placed))
}
