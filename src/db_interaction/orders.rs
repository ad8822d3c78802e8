use std::{collections::HashMap, error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{Connection, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;

use crate::{domain::OrderStatus, error::FieldError, models::{NewOrder, NewOrderItem, Order, OrderItem, OrderLine, PlacedOrder}, schema::{order_items, orders}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

use super::{address_belongs_to_user, find_items_by_ids};

// Error associated with creating an order and its order_items
#[derive(Error)]
pub enum CreateOrderError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("address does not belong to the ordering user")]
    AddressNotFound,
    #[error("order lines do not match the current menu")]
    InvalidLines(Vec<FieldError>)
}

impl Debug for CreateOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Insert the order row and one order_item per line. Must run inside a transaction.
fn insert_order_rows(
    conn: &mut PgConnection,
    user_id: i32,
    address_id: i32,
    lines: &[OrderLine]
) -> Result<PlacedOrder, diesel::result::Error> {
    let order = diesel::insert_into(orders::table)
        .values(&NewOrder{
            user_id,
            address_id,
            status: OrderStatus::Pending
        })
        .returning(Order::as_returning())
        .get_result::<Order>(conn)?;

    let mut created_items = Vec::with_capacity(lines.len());

    for line in lines {
        let order_item = diesel::insert_into(order_items::table)
            .values(&NewOrderItem{
                order_id: order.id,
                item_id: line.item_id,
                quantity: line.quantity,
                price_snapshot: line.price_snapshot
            })
            .returning(OrderItem::as_returning())
            .get_result::<OrderItem>(conn)?;

        created_items.push(order_item);
    }

    Ok(PlacedOrder{
        order,
        order_items: created_items
    })
}

// Compare every line against the menu as it is right now
fn check_lines_against_menu(
    conn: &mut PgConnection,
    lines: &[OrderLine]
) -> Result<Vec<FieldError>, diesel::result::Error> {
    let ids: Vec<i32> = lines.iter().map(|line| line.item_id).collect();
    let prices: HashMap<i32, i32> = find_items_by_ids(conn, &ids)?
        .into_iter()
        .map(|item| (item.id, item.price))
        .collect();

    let mut problems = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        match prices.get(&line.item_id) {
            None => problems.push(FieldError::new(
                format!("items[{}].item_id", index),
                format!("Item {} does not exist", line.item_id)
            )),
            Some(price) if *price != line.price_snapshot => problems.push(FieldError::new(
                format!("items[{}].price_snapshot", index),
                format!(
                    "Price of item {} is now {}, not {}",
                    line.item_id, price, line.price_snapshot
                )
            )),
            Some(_) => {}
        }
    }

    Ok(problems)
}

// Create an order and its line items atomically, trusting the caller's
// address, item ids and price snapshots. Any failing insert rolls the whole
// order back.
#[tracing::instrument(
    "Creating order with order_items",
    skip(conn, lines),
    fields(lines = lines.len())
)]
pub async fn create_order_with_items(
    mut conn: DbConnection,
    user_id: i32,
    address_id: i32,
    lines: Vec<OrderLine>
) -> Result<PlacedOrder, CreateOrderError> {

    let placed = spawn_blocking_with_tracing(move || {
        conn.transaction::<PlacedOrder, CreateOrderError, _>(|conn| {
            Ok(insert_order_rows(conn, user_id, address_id, &lines)?)
        })
    })
    .await??;

    Ok(placed)
}

// Same as `create_order_with_items`, but first checks inside the
// transaction that the address is the user's and that every line names an
// existing item at its current price.
#[tracing::instrument(
    "Placing verified order",
    skip(conn, lines),
    fields(lines = lines.len())
)]
pub async fn place_verified_order(
    mut conn: DbConnection,
    user_id: i32,
    address_id: i32,
    lines: Vec<OrderLine>
) -> Result<PlacedOrder, CreateOrderError> {

    let placed = spawn_blocking_with_tracing(move || {
        conn.transaction::<PlacedOrder, CreateOrderError, _>(|conn| {
            if !address_belongs_to_user(conn, address_id, user_id)? {
                return Err(CreateOrderError::AddressNotFound)
            }

            let problems = check_lines_against_menu(conn, &lines)?;
            if !problems.is_empty() {
                return Err(CreateOrderError::InvalidLines(problems))
            }

            Ok(insert_order_rows(conn, user_id, address_id, &lines)?)
        })
    })
    .await??;

    Ok(placed)
}

#[tracing::instrument(
    "Getting orders of user from db",
    skip(conn)
)]
pub async fn list_orders_for_user(
    mut conn: DbConnection,
    user_id: i32
) -> Result<Vec<Order>, anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        orders::table
            .filter(orders::user_id.eq(user_id))
            .order((orders::created_at.desc(), orders::id.desc()))
            .select(Order::as_select())
            .load::<Order>(&mut conn)
            .context("Failed to load orders")
    })
    .await
    .context("Failed due to threadpool error")?
}

// `None` when the order does not exist or belongs to someone else
#[tracing::instrument(
    "Getting order with order_items",
    skip(conn)
)]
pub async fn get_order_for_user(
    mut conn: DbConnection,
    order_id: i32,
    user_id: i32
) -> Result<Option<PlacedOrder>, anyhow::Error> {
    spawn_blocking_with_tracing(move || -> Result<Option<PlacedOrder>, anyhow::Error> {
        let order = match orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::user_id.eq(user_id))
            .select(Order::as_select())
            .first::<Order>(&mut conn)
            .optional()
            .context("Failed to load order")?
        {
            Some(order) => order,
            None => return Ok(None)
        };

        let lines = order_items::table
            .filter(order_items::order_id.eq(order.id))
            .order(order_items::id.asc())
            .select(OrderItem::as_select())
            .load::<OrderItem>(&mut conn)
            .context("Failed to load order_items")?;

        Ok(Some(PlacedOrder{
            order,
            order_items: lines
        }))
    })
    .await
    .context("Failed due to threadpool error")?
}
