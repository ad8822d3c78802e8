use chrono::{DateTime, Utc};
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::Deserialize;
use serde::Serialize;

use crate::domain::{OrderStatus, UserRole};
use crate::schema::{addresses, items, order_items, orders, restaurants, sessions, users};

// Full users row, password_hash included. Never serialized.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User{
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a>{
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole
}

// Identity carried by a session and returned as `user` on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionUser{
    pub id: i32,
    pub email: String,
    pub role: UserRole
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        SessionUser{
            id: user.id,
            email: user.email,
            role: user.role
        }
    }
}

// One row per live session, `state` is the json encoded session map
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionRecord{
    pub session_key: String,
    pub state: String,
    pub expires_at: DateTime<Utc>
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Address{
    pub id: i32,
    pub user_id: i32,
    pub label: String,
    pub street: String,
    pub city: String,
    pub postal_code: String
}

#[derive(Insertable, Debug)]
#[diesel(table_name = addresses)]
pub struct NewAddress{
    pub user_id: i32,
    pub label: String,
    pub street: String,
    pub city: String,
    pub postal_code: String
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Restaurant{
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>
}

#[derive(Insertable, Debug)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant{
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>
}

// A missing description clears the column, it is not "leave unchanged"
#[derive(AsChangeset, Debug)]
#[diesel(table_name = restaurants)]
#[diesel(treat_none_as_null = true)]
pub struct RestaurantChanges{
    pub name: String,
    pub description: Option<String>
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Item{
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32
}

#[derive(Insertable, Debug)]
#[diesel(table_name = items)]
pub struct NewItem{
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = items)]
#[diesel(treat_none_as_null = true)]
pub struct ItemChanges{
    pub name: String,
    pub description: Option<String>,
    pub price: i32
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order{
    pub id: i32,
    pub user_id: i32,
    pub address_id: i32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>
}

#[derive(Insertable, Debug)]
#[diesel(table_name = orders)]
pub struct NewOrder{
    pub user_id: i32,
    pub address_id: i32,
    pub status: OrderStatus
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItem{
    pub id: i32,
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub price_snapshot: i32
}

#[derive(Insertable, Debug)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem{
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub price_snapshot: i32
}

// One requested order line: which item, how many, and the unit price the
// customer saw when adding it to the cart.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine{
    pub item_id: i32,
    pub quantity: i32,
    pub price_snapshot: i32
}

// An order together with its line items, as returned by the orders endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder{
    pub order: Order,
    #[serde(rename = "orderItems")]
    pub order_items: Vec<OrderItem>
}
