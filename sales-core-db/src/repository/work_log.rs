use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::work_log::WorkLogModel;
use crate::repository::pagination::{Page, PageRequest};

#[async_trait]
pub trait WorkLogRepository: Send + Sync {
    async fn create(&self, log: WorkLogModel) -> RepositoryResult<WorkLogModel>;

    /// Logs of one user, most recent date first
    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> RepositoryResult<Page<WorkLogModel>>;
}
