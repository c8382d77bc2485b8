use uuid::Uuid;

use sales_core_db::RepositoryResult;

use super::repo_impl::UserRepositoryImpl;
use crate::executor::consumed;

impl UserRepositoryImpl {
    /// Make every member of `department_id` follow the department's zone
    pub(super) async fn set_zone_for_department_impl(
        &self,
        department_id: Uuid,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query("UPDATE app_user SET zone_id = $2 WHERE department_id = $1")
            .bind(department_id)
            .bind(zone_id)
            .execute(&mut **transaction)
            .await?;
        Ok(result.rows_affected())
    }
}
