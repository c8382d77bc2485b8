use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;

/// Generic repository trait for deleting multiple entities in a batch
///
/// Returns the number of items actually deleted; unknown ids are skipped.
#[async_trait]
pub trait DeleteBatch: Send + Sync {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize>;
}
