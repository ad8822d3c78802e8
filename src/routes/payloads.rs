// Response envelopes. Every successful body wraps its payload in a named
// key (`{"user": ...}`, `{"restaurants": [...]}`).

use serde::{Deserialize, Serialize};

use crate::models::{Address, Item, Order, Restaurant, SessionUser};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserEnvelope{
    pub user: SessionUser
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddressesEnvelope{
    pub addresses: Vec<Address>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddressEnvelope{
    pub address: Address
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RestaurantsEnvelope{
    pub restaurants: Vec<Restaurant>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RestaurantEnvelope{
    pub restaurant: Restaurant
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RestaurantDetails{
    pub restaurant: Restaurant,
    pub items: Vec<Item>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ItemEnvelope{
    pub item: Item
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OrdersEnvelope{
    pub orders: Vec<Order>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus{
    pub status: String
}
