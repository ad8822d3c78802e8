pub mod routes;
pub mod startup;
pub mod configuration;
pub mod telemetry;
pub mod utils;
pub mod schema;
pub mod models;
pub mod password;
pub mod domain;
pub mod auth;
pub mod db_interaction;
pub mod error;
pub mod session_state;
pub mod session_store;
pub mod cart;
pub mod client;
pub mod seed;
