mod addresses;
mod errors;
mod items;
mod orders;
mod restaurants;
mod sessions;
mod user;

pub use addresses::*;
pub use errors::DeleteError;
pub use items::*;
pub use orders::*;
pub use restaurants::*;
pub use sessions::*;
pub use user::*;
