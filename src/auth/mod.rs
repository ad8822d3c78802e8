pub mod extractors;
pub mod guard;

pub use extractors::{Authenticated, IsCustomer, IsOwner};
pub use guard::{ensure, Capability};
