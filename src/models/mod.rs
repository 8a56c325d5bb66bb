pub mod account;
pub mod request;
pub mod role;

pub use account::*;
pub use request::*;
pub use role::*;
