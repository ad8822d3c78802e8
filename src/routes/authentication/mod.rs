mod register;
mod login;
mod logout;

pub use register::*;
pub use login::*;
pub use logout::*;
