pub mod repo_impl;
pub mod create_batch;
pub mod update_batch;
pub mod find_by_username;
pub mod list;
pub mod counts;
pub mod set_zone_for_department;

pub use repo_impl::UserRepositoryImpl;
