use async_trait::async_trait;
use uuid::Uuid;

use sales_core_db::models::SystemLogModel;
use sales_core_db::repository::{Page, PageRequest, SystemLogRepository};
use sales_core_db::RepositoryResult;

use crate::executor::{consumed, Executor};

/// Append-only; rows are inserted and read, never updated or deleted.
pub struct SystemLogRepositoryImpl {
    pub executor: Executor,
}

impl SystemLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl SystemLogRepository for SystemLogRepositoryImpl {
    async fn record(&self, user_id: Uuid, action: &str) -> RepositoryResult<SystemLogModel> {
        let entry = SystemLogModel::new(user_id, action);

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        sqlx::query(
            "INSERT INTO system_log (id, user_id, action, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(entry.created_at)
        .execute(&mut **transaction)
        .await?;
        Ok(entry)
    }

    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<SystemLogModel>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM system_log")
            .fetch_one(&mut **transaction)
            .await?;
        let items = sqlx::query_as::<_, SystemLogModel>(
            "SELECT * FROM system_log ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&mut **transaction)
        .await?;
        Ok(Page::new(items, total as usize, page))
    }
}
