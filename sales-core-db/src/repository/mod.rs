pub mod contract;
pub mod create_batch;
pub mod delete_batch;
pub mod exist_by_ids;
pub mod identity;
pub mod lead;
pub mod load;
pub mod load_batch;
pub mod organization;
pub mod ownership_filter;
pub mod pagination;
pub mod system_log;
pub mod unit_of_work;
pub mod update_batch;
pub mod work_log;

// Re-exports
pub use contract::*;
pub use create_batch::*;
pub use delete_batch::*;
pub use exist_by_ids::*;
pub use identity::*;
pub use lead::*;
pub use load::*;
pub use load_batch::*;
pub use organization::*;
pub use ownership_filter::*;
pub use pagination::*;
pub use system_log::*;
pub use unit_of_work::*;
pub use update_batch::*;
pub use work_log::*;
