pub mod repo_impl;
pub mod create_batch;
pub mod update_batch;
pub mod list;
pub mod aggregate_amount;

pub use repo_impl::ContractRepositoryImpl;
