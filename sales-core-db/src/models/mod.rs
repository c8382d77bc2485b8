pub mod audit;
pub mod common_enums;
pub mod contract;
pub mod identifiable;
pub mod identity;
pub mod lead;
pub mod organization;
pub mod work_log;

// Re-exports
pub use audit::*;
pub use common_enums::*;
pub use contract::*;
pub use identifiable::*;
pub use identity::*;
pub use lead::*;
pub use organization::*;
pub use work_log::*;
