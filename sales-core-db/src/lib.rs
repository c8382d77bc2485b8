pub mod error;
pub mod models;
pub mod repository;

pub use error::{RepositoryError, RepositoryResult};
