// In-memory cart kept by a client between browsing a menu and placing an
// order.
// Lines are keyed by item id and keep the order in which items were first
// added. Each line remembers the unit price seen on the menu; that price is
// sent as the `price_snapshot` of the order line.

use serde::{Deserialize, Serialize};

use crate::models::{Item, OrderLine};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CartLine{
    pub item_id: i32,
    pub name: String,
    pub price: i32,
    pub quantity: i32
}

// Body of `POST /api/orders`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest{
    pub address_id: i32,
    pub items: Vec<OrderLine>
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart{
    lines: Vec<CartLine>
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // Adding an item already in the cart bumps its quantity
    pub fn add_item(&mut self, item: &Item, quantity: i32) {
        if quantity <= 0 {
            return
        }

        match self.lines.iter_mut().find(|line| line.item_id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine{
                item_id: item.id,
                name: item.name.clone(),
                price: item.price,
                quantity
            })
        }
    }

    pub fn remove_item(&mut self, item_id: i32) {
        self.lines.retain(|line| line.item_id != item_id);
    }

    // Set the quantity of a line; zero or less removes it.
    pub fn update_quantity(&mut self, item_id: i32, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(item_id);
            return
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.item_id == item_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total_cents(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| i64::from(line.price) * i64::from(line.quantity))
            .sum()
    }

    pub fn to_order_request(&self, address_id: i32) -> OrderRequest {
        OrderRequest{
            address_id,
            items: self.lines
                .iter()
                .map(|line| OrderLine{
                    item_id: line.item_id,
                    quantity: line.quantity,
                    price_snapshot: line.price
                })
                .collect()
        }
    }
}
