use uuid::Uuid;

use sales_core_db::RepositoryResult;

use super::repo_impl::ZoneRepositoryImpl;
use crate::executor::consumed;

impl ZoneRepositoryImpl {
    pub(super) async fn clear_director_impl(&self, user_id: Uuid) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query("UPDATE zone SET director_id = NULL WHERE director_id = $1")
            .bind(user_id)
            .execute(&mut **transaction)
            .await?;
        Ok(result.rows_affected())
    }
}
