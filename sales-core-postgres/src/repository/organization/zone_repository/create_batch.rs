use async_trait::async_trait;

use sales_core_db::models::ZoneModel;
use sales_core_db::repository::CreateBatch;
use sales_core_db::RepositoryResult;

use super::repo_impl::ZoneRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl CreateBatch<ZoneModel> for ZoneRepositoryImpl {
    async fn create_batch(&self, items: Vec<ZoneModel>) -> RepositoryResult<Vec<ZoneModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO zone (id, name, director_id, created_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.director_id)
            .bind(item.created_at)
            .execute(&mut **transaction)
            .await?;
        }
        Ok(items)
    }
}
