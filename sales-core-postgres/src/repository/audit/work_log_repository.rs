use async_trait::async_trait;
use uuid::Uuid;

use sales_core_db::models::WorkLogModel;
use sales_core_db::repository::{Page, PageRequest, WorkLogRepository};
use sales_core_db::RepositoryResult;

use crate::executor::{consumed, Executor};

pub struct WorkLogRepositoryImpl {
    pub executor: Executor,
}

impl WorkLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl WorkLogRepository for WorkLogRepositoryImpl {
    async fn create(&self, log: WorkLogModel) -> RepositoryResult<WorkLogModel> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        sqlx::query(
            r#"
            INSERT INTO work_log
                (id, user_id, calls, valid_calls, visits, contracts, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(log.id)
        .bind(log.user_id)
        .bind(log.calls)
        .bind(log.valid_calls)
        .bind(log.visits)
        .bind(log.contracts)
        .bind(log.date)
        .bind(log.created_at)
        .execute(&mut **transaction)
        .await?;
        Ok(log)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> RepositoryResult<Page<WorkLogModel>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM work_log WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut **transaction)
            .await?;
        let items = sqlx::query_as::<_, WorkLogModel>(
            r#"
            SELECT * FROM work_log
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&mut **transaction)
        .await?;
        Ok(Page::new(items, total as usize, page))
    }
}
