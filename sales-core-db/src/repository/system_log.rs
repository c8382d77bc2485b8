use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::audit::SystemLogModel;
use crate::repository::pagination::{Page, PageRequest};

/// Append-only audit sink
#[async_trait]
pub trait SystemLogRepository: Send + Sync {
    async fn record(&self, user_id: Uuid, action: &str) -> RepositoryResult<SystemLogModel>;

    /// Entries, newest first
    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<SystemLogModel>>;
}
