pub mod system_log_repository;
pub mod work_log_repository;

pub use system_log_repository::SystemLogRepositoryImpl;
pub use work_log_repository::WorkLogRepositoryImpl;
