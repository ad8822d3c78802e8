mod get;
mod post;
mod put;

pub use get::*;
pub use post::*;
pub use put::*;
