use anyhow::Context;
use diesel::{dsl::exists, ExpressionMethods, PgConnection, QueryDsl, QueryResult, RunQueryDsl, SelectableHelper};

use crate::{models::{Address, NewAddress}, schema::addresses, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

use super::errors::{map_delete_error, DeleteError};

#[tracing::instrument(
    "Getting addresses of user from db",
    skip(conn)
)]
pub async fn list_addresses_for_user(
    mut conn: DbConnection,
    user_id: i32
) -> Result<Vec<Address>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        addresses::table
            .filter(addresses::user_id.eq(user_id))
            .order(addresses::id.desc())
            .select(Address::as_select())
            .load::<Address>(&mut conn)
            .context("Failed to load addresses")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Inserting address into db",
    skip_all,
    fields(user_id = %new_address.user_id)
)]
pub async fn create_address(
    mut conn: DbConnection,
    new_address: NewAddress
) -> Result<Address, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(addresses::table)
            .values(&new_address)
            .returning(Address::as_returning())
            .get_result::<Address>(&mut conn)
            .context("Failed to insert address")
    })
    .await
    .context("Failed due to threadpool error")?
}

// Returns the number of deleted rows, zero when the address is not the user's
#[tracing::instrument(
    "Deleting address from db",
    skip(conn)
)]
pub async fn delete_address(
    mut conn: DbConnection,
    address_id: i32,
    user_id: i32
) -> Result<usize, DeleteError>{
    let deleted = spawn_blocking_with_tracing(move || {
        diesel::delete(addresses::table)
            .filter(addresses::id.eq(address_id))
            .filter(addresses::user_id.eq(user_id))
            .execute(&mut conn)
            .map_err(|e| map_delete_error(e, "Failed to delete address"))
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(deleted)
}

pub fn address_belongs_to_user(
    conn: &mut PgConnection,
    address_id: i32,
    user_id: i32
) -> QueryResult<bool>{
    diesel::select(exists(
        addresses::table
            .filter(addresses::id.eq(address_id))
            .filter(addresses::user_id.eq(user_id))
    ))
    .get_result::<bool>(conn)
}
