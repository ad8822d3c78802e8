pub mod form_value;
pub mod order_status;
pub mod user_role;

pub use form_value::FormValue;
pub use order_status::OrderStatus;
pub use user_role::UserRole;
