// Ownership checks for mutations.
// Every mutating handler names the capability it needs before it touches a
// row. A capability that does not hold is reported as `NotFound`, so a
// caller cannot tell a missing resource from somebody else's.

use actix_web::web;
use anyhow::Context;
use diesel::{PgConnection, QueryResult};

use crate::{db_interaction::{address_belongs_to_user, item_owned_by, restaurant_owned_by}, error::ApiError, models::SessionUser, telemetry::spawn_blocking_with_tracing, utils::{get_pooled_connection, DbPool}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability{
    // The user placed this address in their address book.
    UserOfAddress(i32),
    // The user owns this restaurant.
    OwnerOfRestaurant(i32),
    // The item is on the menu of this restaurant and the user owns it.
    OwnerOfItem{ restaurant_id: i32, item_id: i32 }
}

impl Capability {
    pub fn resource(&self) -> &'static str {
        match self {
            Capability::UserOfAddress(_) => "Address",
            Capability::OwnerOfRestaurant(_) => "Restaurant",
            Capability::OwnerOfItem{ .. } => "Item"
        }
    }

    fn holds(&self, conn: &mut PgConnection, user: &SessionUser) -> QueryResult<bool> {
        match *self {
            Capability::UserOfAddress(address_id) => address_belongs_to_user(conn, address_id, user.id),
            Capability::OwnerOfRestaurant(restaurant_id) => restaurant_owned_by(conn, restaurant_id, user.id),
            Capability::OwnerOfItem{ restaurant_id, item_id } => item_owned_by(conn, restaurant_id, item_id, user.id)
        }
    }
}

#[tracing::instrument(
    "Checking capability",
    skip(pool, user),
    fields(user_id = %user.id)
)]
pub async fn ensure(
    pool: &web::Data<DbPool>,
    user: &SessionUser,
    capability: Capability
) -> Result<(), ApiError> {
    let mut conn = get_pooled_connection(pool).await?;
    let user_clone = user.clone();

    let holds = spawn_blocking_with_tracing(move || {
        capability.holds(&mut conn, &user_clone)
            .context("Failed to check capability")
    })
    .await
    .context("Failed due to threadpool error")??;

    if holds {
        Ok(())
    } else {
        tracing::info!(resource = capability.resource(), "Capability does not hold");
        Err(ApiError::NotFound(capability.resource()))
    }
}
