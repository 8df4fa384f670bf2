pub mod common;
pub mod user;
pub mod verification;

pub use common::*;
pub use user::*;
pub use verification::*;
