// Development fixtures: wipe every table and insert one customer, one owner,
// an address, a restaurant and a three item menu.

use anyhow::Context;
use diesel::{Connection, RunQueryDsl};
use secrecy::{ExposeSecret, SecretString};

use crate::{domain::UserRole, models::{NewAddress, NewItem, NewRestaurant, NewUser}, password::hash_password, schema::{addresses, items, order_items, orders, restaurants, sessions, users}, telemetry::spawn_blocking_with_tracing, utils::DbPool};

pub const CUSTOMER_EMAIL: &str = "customer@test.com";
pub const OWNER_EMAIL: &str = "owner@test.com";
pub const SEED_PASSWORD: &str = "password123";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary{
    pub customer_id: i32,
    pub owner_id: i32,
    pub address_id: i32,
    pub restaurant_id: i32,
    pub item_ids: Vec<i32>
}

fn menu(restaurant_id: i32) -> Vec<NewItem> {
    [
        ("Burger", "Juicy burger", 999),
        ("Fries", "Crispy fries", 499),
        ("Soda", "Cold drink", 199)
    ]
    .into_iter()
    .map(|(name, description, price)| NewItem{
        restaurant_id,
        name: name.to_string(),
        description: Some(description.to_string()),
        price
    })
    .collect()
}

#[tracing::instrument(
    "Seeding database",
    skip_all
)]
pub async fn seed_database(pool: &DbPool) -> Result<SeedSummary, anyhow::Error> {
    let password_hash = hash_password(SecretString::from(SEED_PASSWORD.to_string())).await?;
    let pool = pool.clone();

    spawn_blocking_with_tracing(move || -> Result<SeedSummary, anyhow::Error> {
        let mut conn = pool.get()
            .context("Failed to get connection from pool")?;

        conn.transaction::<SeedSummary, anyhow::Error, _>(|conn| {
            tracing::info!("Clearing existing data");
            diesel::delete(sessions::table).execute(conn)?;
            diesel::delete(order_items::table).execute(conn)?;
            diesel::delete(orders::table).execute(conn)?;
            diesel::delete(items::table).execute(conn)?;
            diesel::delete(restaurants::table).execute(conn)?;
            diesel::delete(addresses::table).execute(conn)?;
            diesel::delete(users::table).execute(conn)?;

            tracing::info!("Creating users");
            let customer_id = diesel::insert_into(users::table)
                .values(&NewUser{
                    email: CUSTOMER_EMAIL,
                    password_hash: password_hash.expose_secret(),
                    role: UserRole::Customer
                })
                .returning(users::id)
                .get_result::<i32>(conn)
                .context("Failed to insert customer")?;

            let owner_id = diesel::insert_into(users::table)
                .values(&NewUser{
                    email: OWNER_EMAIL,
                    password_hash: password_hash.expose_secret(),
                    role: UserRole::Owner
                })
                .returning(users::id)
                .get_result::<i32>(conn)
                .context("Failed to insert owner")?;

            let address_id = diesel::insert_into(addresses::table)
                .values(&NewAddress{
                    user_id: customer_id,
                    label: "Home".to_string(),
                    street: "123 Main St".to_string(),
                    city: "Sample City".to_string(),
                    postal_code: "12345".to_string()
                })
                .returning(addresses::id)
                .get_result::<i32>(conn)
                .context("Failed to insert address")?;

            let restaurant_id = diesel::insert_into(restaurants::table)
                .values(&NewRestaurant{
                    owner_id,
                    name: "Tasty Bites".to_string(),
                    description: Some("Delicious sample food".to_string())
                })
                .returning(restaurants::id)
                .get_result::<i32>(conn)
                .context("Failed to insert restaurant")?;

            let item_ids = diesel::insert_into(items::table)
                .values(&menu(restaurant_id))
                .returning(items::id)
                .get_results::<i32>(conn)
                .context("Failed to insert menu items")?;

            Ok(SeedSummary{
                customer_id,
                owner_id,
                address_id,
                restaurant_id,
                item_ids
            })
        })
    })
    .await
    .context("Failed due to threadpool error")?
}
