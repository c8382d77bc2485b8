pub mod repo_impl;
pub mod create_batch;
pub mod update_batch;
pub mod list;
pub mod lifecycle;
pub mod placement;

pub use repo_impl::CustomerRepositoryImpl;
