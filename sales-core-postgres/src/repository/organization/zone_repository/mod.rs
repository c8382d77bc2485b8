pub mod repo_impl;
pub mod create_batch;
pub mod update_batch;
pub mod find_by_name;
pub mod list;
pub mod clear_director;

pub use repo_impl::ZoneRepositoryImpl;
