use anyhow::Context;
use diesel::{dsl::exists, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, QueryResult, RunQueryDsl, SelectableHelper};

use crate::{models::{NewRestaurant, Restaurant, RestaurantChanges}, schema::restaurants, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

#[tracing::instrument(
    "Getting restaurants from db",
    skip_all
)]
pub async fn list_restaurants(
    mut conn: DbConnection
) -> Result<Vec<Restaurant>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        restaurants::table
            .order(restaurants::id.desc())
            .select(Restaurant::as_select())
            .load::<Restaurant>(&mut conn)
            .context("Failed to load restaurants")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting restaurants of owner from db",
    skip(conn)
)]
pub async fn list_restaurants_for_owner(
    mut conn: DbConnection,
    owner_id: i32
) -> Result<Vec<Restaurant>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        restaurants::table
            .filter(restaurants::owner_id.eq(owner_id))
            .order(restaurants::id.desc())
            .select(Restaurant::as_select())
            .load::<Restaurant>(&mut conn)
            .context("Failed to load restaurants of owner")
    })
    .await
    .context("Failed due to threadpool error")?
}

pub fn find_restaurant(
    conn: &mut PgConnection,
    restaurant_id: i32
) -> QueryResult<Option<Restaurant>>{
    restaurants::table
        .find(restaurant_id)
        .select(Restaurant::as_select())
        .first::<Restaurant>(conn)
        .optional()
}

#[tracing::instrument(
    "Inserting restaurant into db",
    skip_all,
    fields(owner_id = %new_restaurant.owner_id)
)]
pub async fn create_restaurant(
    mut conn: DbConnection,
    new_restaurant: NewRestaurant
) -> Result<Restaurant, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(restaurants::table)
            .values(&new_restaurant)
            .returning(Restaurant::as_returning())
            .get_result::<Restaurant>(&mut conn)
            .context("Failed to insert restaurant")
    })
    .await
    .context("Failed due to threadpool error")?
}

// `None` when no row matched both the id and the owner
#[tracing::instrument(
    "Updating restaurant in db",
    skip(conn, changes)
)]
pub async fn update_restaurant(
    mut conn: DbConnection,
    restaurant_id: i32,
    owner_id: i32,
    changes: RestaurantChanges
) -> Result<Option<Restaurant>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::update(restaurants::table)
            .filter(restaurants::id.eq(restaurant_id))
            .filter(restaurants::owner_id.eq(owner_id))
            .set(&changes)
            .returning(Restaurant::as_returning())
            .get_result::<Restaurant>(&mut conn)
            .optional()
            .context("Failed to update restaurant")
    })
    .await
    .context("Failed due to threadpool error")?
}

pub fn restaurant_owned_by(
    conn: &mut PgConnection,
    restaurant_id: i32,
    owner_id: i32
) -> QueryResult<bool>{
    diesel::select(exists(
        restaurants::table
            .filter(restaurants::id.eq(restaurant_id))
            .filter(restaurants::owner_id.eq(owner_id))
    ))
    .get_result::<bool>(conn)
}
