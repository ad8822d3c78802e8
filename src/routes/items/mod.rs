mod post;
mod update;
mod delete;

pub use post::*;
pub use update::*;
pub use delete::*;
