use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;

/// Generic repository trait for checking existence of multiple entities by their IDs
///
/// Returns one `(id, exists)` tuple per requested id, in request order.
#[async_trait]
pub trait ExistByIds: Send + Sync {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>>;
}
