use async_trait::async_trait;

use sales_core_db::models::{DepartmentModel, Identifiable};
use sales_core_db::repository::UpdateBatch;
use sales_core_db::{RepositoryError, RepositoryResult};

use super::repo_impl::DepartmentRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl UpdateBatch<DepartmentModel> for DepartmentRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<DepartmentModel>,
    ) -> RepositoryResult<Vec<DepartmentModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            let result = sqlx::query(
                r#"
                UPDATE department
                SET name = $2, zone_id = $3, manager_id = $4
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.zone_id)
            .bind(item.manager_id)
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::not_found(DepartmentModel::ENTITY_NAME, item.id));
            }
        }
        Ok(items)
    }
}
