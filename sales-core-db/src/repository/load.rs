use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::identifiable::Identifiable;
use crate::repository::load_batch::LoadBatch;

/// Load a single entity, failing with [`RepositoryError::NotFound`] when it does not exist.
///
/// Implemented for every [`LoadBatch`] repository, including trait objects.
#[async_trait]
pub trait Load<T: Identifiable>: Send + Sync {
    async fn load(&self, id: Uuid) -> RepositoryResult<T>;

    /// Like [`Load::load`] but reports absence as `None`
    async fn find(&self, id: Uuid) -> RepositoryResult<Option<T>>;
}

#[async_trait]
impl<T, R> Load<T> for R
where
    T: Identifiable + Send + 'static,
    R: LoadBatch<T> + ?Sized,
{
    async fn load(&self, id: Uuid) -> RepositoryResult<T> {
        <Self as Load<T>>::find(self, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(T::ENTITY_NAME, id))
    }

    async fn find(&self, id: Uuid) -> RepositoryResult<Option<T>> {
        let results = <Self as LoadBatch<T>>::load_batch(self, &[id]).await?;
        Ok(results.into_iter().next().flatten())
    }
}
