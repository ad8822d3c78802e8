mod get;
mod post;
mod delete;

pub use get::*;
pub use post::*;
pub use delete::*;
