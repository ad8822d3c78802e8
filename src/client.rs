// Typed client for the HTTP API.
// The session cookie issued by register and login is kept in the client's
// cookie store and sent on every later request, so one `FoodClient` is one
// logged in browser.

use std::{error::Error, fmt::Debug, time::Duration};

use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::Cart, domain::UserRole, error::FieldError, models::{Address, Item, Order, PlacedOrder, Restaurant, SessionUser}, routes::payloads::{AddressEnvelope, AddressesEnvelope, HealthStatus, ItemEnvelope, OrdersEnvelope, RestaurantDetails, RestaurantEnvelope, RestaurantsEnvelope, UserEnvelope}, utils::error_fmt_chain};

// Error body as sent by the server, either `{error}` or `{errors}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorBody{
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>
}

#[derive(Error)]
pub enum ClientError{
    #[error("server answered {status}")]
    Api{
        status: u16,
        body: ApiErrorBody
    },
    #[error("failed to talk to the server")]
    Transport(#[from] reqwest::Error)
}

impl Debug for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[derive(Serialize)]
struct Credentials<'a>{
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<UserRole>
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AddressInput{
    pub label: String,
    pub street: String,
    pub city: String,
    pub postal_code: String
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RestaurantInput{
    pub name: String,
    pub description: Option<String>
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemInput{
    pub name: String,
    pub description: Option<String>,
    pub price: i32
}

#[derive(Clone)]
pub struct FoodClient{
    http_client: Client,
    base_url: String
}

impl FoodClient {
    pub fn new(base_url: String, timeout: u64) -> Result<FoodClient, ClientError> {
        let http_client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(FoodClient{
            http_client,
            base_url: base_url.trim_end_matches('/').to_string()
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Turn any non 2xx answer into `ClientError::Api`, keeping the server's body
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response)
        }

        let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
        Err(ClientError::Api{
            status: status.as_u16(),
            body
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(), ClientError> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.fetch(self.http_client.get(self.url("/api/health"))).await
    }

    #[tracing::instrument(
        "Registering through api client",
        skip(self, password)
    )]
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        role: UserRole
    ) -> Result<SessionUser, ClientError> {
        let body = Credentials{
            email,
            password: password.expose_secret(),
            role: Some(role)
        };

        let envelope: UserEnvelope = self.fetch(
            self.http_client.post(self.url("/api/auth/register")).json(&body)
        ).await?;
        Ok(envelope.user)
    }

    #[tracing::instrument(
        "Logging in through api client",
        skip(self, password)
    )]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString
    ) -> Result<SessionUser, ClientError> {
        let body = Credentials{
            email,
            password: password.expose_secret(),
            role: None
        };

        let envelope: UserEnvelope = self.fetch(
            self.http_client.post(self.url("/api/auth/login")).json(&body)
        ).await?;
        Ok(envelope.user)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.execute(self.http_client.post(self.url("/api/auth/logout"))).await
    }

    pub async fn me(&self) -> Result<SessionUser, ClientError> {
        let envelope: UserEnvelope = self.fetch(self.http_client.get(self.url("/api/users/me"))).await?;
        Ok(envelope.user)
    }

    pub async fn addresses(&self) -> Result<Vec<Address>, ClientError> {
        let envelope: AddressesEnvelope = self.fetch(self.http_client.get(self.url("/api/addresses"))).await?;
        Ok(envelope.addresses)
    }

    pub async fn create_address(&self, address: &AddressInput) -> Result<Address, ClientError> {
        let envelope: AddressEnvelope = self.fetch(
            self.http_client.post(self.url("/api/addresses")).json(address)
        ).await?;
        Ok(envelope.address)
    }

    pub async fn delete_address(&self, address_id: i32) -> Result<(), ClientError> {
        self.execute(
            self.http_client.delete(self.url(&format!("/api/addresses/{}", address_id)))
        ).await
    }

    pub async fn restaurants(&self) -> Result<Vec<Restaurant>, ClientError> {
        let envelope: RestaurantsEnvelope = self.fetch(self.http_client.get(self.url("/api/restaurants"))).await?;
        Ok(envelope.restaurants)
    }

    pub async fn my_restaurants(&self) -> Result<Vec<Restaurant>, ClientError> {
        let envelope: RestaurantsEnvelope = self.fetch(self.http_client.get(self.url("/api/restaurants/mine"))).await?;
        Ok(envelope.restaurants)
    }

    pub async fn restaurant(&self, restaurant_id: i32) -> Result<RestaurantDetails, ClientError> {
        self.fetch(
            self.http_client.get(self.url(&format!("/api/restaurants/{}", restaurant_id)))
        ).await
    }

    pub async fn create_restaurant(&self, restaurant: &RestaurantInput) -> Result<Restaurant, ClientError> {
        let envelope: RestaurantEnvelope = self.fetch(
            self.http_client.post(self.url("/api/restaurants")).json(restaurant)
        ).await?;
        Ok(envelope.restaurant)
    }

    pub async fn update_restaurant(
        &self,
        restaurant_id: i32,
        restaurant: &RestaurantInput
    ) -> Result<Restaurant, ClientError> {
        let envelope: RestaurantEnvelope = self.fetch(
            self.http_client
                .put(self.url(&format!("/api/restaurants/{}", restaurant_id)))
                .json(restaurant)
        ).await?;
        Ok(envelope.restaurant)
    }

    pub async fn create_item(&self, restaurant_id: i32, item: &ItemInput) -> Result<Item, ClientError> {
        let envelope: ItemEnvelope = self.fetch(
            self.http_client
                .post(self.url(&format!("/api/restaurants/{}/items", restaurant_id)))
                .json(item)
        ).await?;
        Ok(envelope.item)
    }

    pub async fn update_item(
        &self,
        restaurant_id: i32,
        item_id: i32,
        item: &ItemInput
    ) -> Result<Item, ClientError> {
        let envelope: ItemEnvelope = self.fetch(
            self.http_client
                .put(self.url(&format!("/api/restaurants/{}/items/{}", restaurant_id, item_id)))
                .json(item)
        ).await?;
        Ok(envelope.item)
    }

    pub async fn delete_item(&self, restaurant_id: i32, item_id: i32) -> Result<(), ClientError> {
        self.execute(
            self.http_client.delete(self.url(&format!("/api/restaurants/{}/items/{}", restaurant_id, item_id)))
        ).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>, ClientError> {
        let envelope: OrdersEnvelope = self.fetch(self.http_client.get(self.url("/api/orders"))).await?;
        Ok(envelope.orders)
    }

    pub async fn order(&self, order_id: i32) -> Result<PlacedOrder, ClientError> {
        self.fetch(
            self.http_client.get(self.url(&format!("/api/orders/{}", order_id)))
        ).await
    }

    // The cart is left untouched, callers clear it once the order is accepted
    #[tracing::instrument(
        "Placing order through api client",
        skip(self, cart),
        fields(lines = cart.lines().len())
    )]
    pub async fn place_order(&self, cart: &Cart, address_id: i32) -> Result<PlacedOrder, ClientError> {
        self.fetch(
            self.http_client
                .post(self.url("/api/orders"))
                .json(&cart.to_order_request(address_id))
        ).await
    }
}
