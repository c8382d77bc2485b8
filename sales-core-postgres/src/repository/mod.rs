pub mod audit;
pub mod contract;
pub mod db_init;
pub mod identity;
pub mod lead;
pub mod organization;

pub use audit::*;
pub use contract::*;
pub use identity::*;
pub use lead::*;
pub use organization::*;
