pub mod contract;
pub mod contract_status;

pub use contract::*;
pub use contract_status::*;
