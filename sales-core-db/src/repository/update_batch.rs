use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Generic repository trait for updating multiple entities in a batch
///
/// Each row is replaced as a whole; the last committed write wins.
/// Updating an entity that no longer exists fails with `RepositoryError::NotFound`.
#[async_trait]
pub trait UpdateBatch<T: Identifiable>: Send + Sync {
    async fn update_batch(&self, items: Vec<T>) -> RepositoryResult<Vec<T>>;
}
