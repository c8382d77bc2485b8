use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Generic repository trait for creating multiple entities in a batch
///
/// All creates are performed within the caller's transaction.
/// Returns saved items with any generated fields populated.
/// A uniqueness violation is reported as `RepositoryError::Conflict`.
#[async_trait]
pub trait CreateBatch<T: Identifiable>: Send + Sync {
    async fn create_batch(&self, items: Vec<T>) -> RepositoryResult<Vec<T>>;
}
