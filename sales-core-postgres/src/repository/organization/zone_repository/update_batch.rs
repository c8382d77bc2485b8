use async_trait::async_trait;

use sales_core_db::models::{Identifiable, ZoneModel};
use sales_core_db::repository::UpdateBatch;
use sales_core_db::{RepositoryError, RepositoryResult};

use super::repo_impl::ZoneRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl UpdateBatch<ZoneModel> for ZoneRepositoryImpl {
    async fn update_batch(&self, items: Vec<ZoneModel>) -> RepositoryResult<Vec<ZoneModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            let result = sqlx::query(
                r#"
                UPDATE zone
                SET name = $2, director_id = $3
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.director_id)
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::not_found(ZoneModel::ENTITY_NAME, item.id));
            }
        }
        Ok(items)
    }
}
