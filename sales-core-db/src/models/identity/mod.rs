pub mod role;
pub mod user;
pub mod user_profile;

pub use role::*;
pub use user::*;
pub use user_profile::*;
