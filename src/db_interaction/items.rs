use anyhow::Context;
use diesel::{dsl::exists, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, QueryResult, RunQueryDsl, SelectableHelper};

use crate::{models::{Item, ItemChanges, NewItem, Restaurant}, schema::{items, restaurants}, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

use super::errors::{map_delete_error, DeleteError};

use super::find_restaurant;

pub fn list_items_for_restaurant(
    conn: &mut PgConnection,
    restaurant_id: i32
) -> QueryResult<Vec<Item>>{
    items::table
        .filter(items::restaurant_id.eq(restaurant_id))
        .order(items::id.asc())
        .select(Item::as_select())
        .load::<Item>(conn)
}

// Restaurant and its menu, `None` when the restaurant does not exist
#[tracing::instrument(
    "Getting restaurant with items from db",
    skip(conn)
)]
pub async fn get_restaurant_with_items(
    mut conn: DbConnection,
    restaurant_id: i32
) -> Result<Option<(Restaurant, Vec<Item>)>, anyhow::Error>{
    spawn_blocking_with_tracing(move || -> Result<Option<(Restaurant, Vec<Item>)>, anyhow::Error> {
        let restaurant = match find_restaurant(&mut conn, restaurant_id)
            .context("Failed to load restaurant")?
        {
            Some(restaurant) => restaurant,
            None => return Ok(None)
        };

        let items = list_items_for_restaurant(&mut conn, restaurant_id)
            .context("Failed to load items of restaurant")?;

        Ok(Some((restaurant, items)))
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Inserting item into db",
    skip_all,
    fields(restaurant_id = %new_item.restaurant_id)
)]
pub async fn create_item(
    mut conn: DbConnection,
    new_item: NewItem
) -> Result<Item, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(items::table)
            .values(&new_item)
            .returning(Item::as_returning())
            .get_result::<Item>(&mut conn)
            .context("Failed to insert item")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Updating item in db",
    skip(conn, changes)
)]
pub async fn update_item(
    mut conn: DbConnection,
    item_id: i32,
    restaurant_id: i32,
    changes: ItemChanges
) -> Result<Option<Item>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::update(items::table)
            .filter(items::id.eq(item_id))
            .filter(items::restaurant_id.eq(restaurant_id))
            .set(&changes)
            .returning(Item::as_returning())
            .get_result::<Item>(&mut conn)
            .optional()
            .context("Failed to update item")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Deleting item from db",
    skip(conn)
)]
pub async fn delete_item(
    mut conn: DbConnection,
    item_id: i32,
    restaurant_id: i32
) -> Result<usize, DeleteError>{
    let deleted = spawn_blocking_with_tracing(move || {
        diesel::delete(items::table)
            .filter(items::id.eq(item_id))
            .filter(items::restaurant_id.eq(restaurant_id))
            .execute(&mut conn)
            .map_err(|e| map_delete_error(e, "Failed to delete item"))
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(deleted)
}

// Item sits on the menu of a restaurant owned by `owner_id`
pub fn item_owned_by(
    conn: &mut PgConnection,
    restaurant_id: i32,
    item_id: i32,
    owner_id: i32
) -> QueryResult<bool>{
    diesel::select(exists(
        items::table
            .inner_join(restaurants::table)
            .filter(items::id.eq(item_id))
            .filter(items::restaurant_id.eq(restaurant_id))
            .filter(restaurants::owner_id.eq(owner_id))
    ))
    .get_result::<bool>(conn)
}

pub fn find_items_by_ids(
    conn: &mut PgConnection,
    item_ids: &[i32]
) -> QueryResult<Vec<Item>>{
    items::table
        .filter(items::id.eq_any(item_ids))
        .select(Item::as_select())
        .load::<Item>(conn)
}
