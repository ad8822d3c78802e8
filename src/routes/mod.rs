mod authentication;
mod health_check;
mod addresses;
mod restaurants;
mod items;
mod order;
mod users;
pub mod payloads;

pub use authentication::*;
pub use health_check::*;
pub use addresses::*;
pub use restaurants::*;
pub use items::*;
pub use order::*;
pub use users::*;
