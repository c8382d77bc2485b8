use async_trait::async_trait;

use sales_core_db::models::{CustomerModel, Identifiable};
use sales_core_db::repository::UpdateBatch;
use sales_core_db::{RepositoryError, RepositoryResult};

use super::repo_impl::CustomerRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl UpdateBatch<CustomerModel> for CustomerRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<CustomerModel>,
    ) -> RepositoryResult<Vec<CustomerModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            let result = sqlx::query(
                r#"
                UPDATE customer
                SET name = $2, phone = $3, age = $4, gender = $5, address = $6,
                    loan_intent = $7, is_in_public_sea = $8, saler_id = $9,
                    department_id = $10, zone_id = $11, updated_at = $12
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.phone.as_str())
            .bind(item.age)
            .bind(item.gender)
            .bind(item.address.as_deref())
            .bind(item.loan_intent)
            .bind(item.is_in_public_sea)
            .bind(item.saler_id)
            .bind(item.department_id)
            .bind(item.zone_id)
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::not_found(CustomerModel::ENTITY_NAME, item.id));
            }
        }
        Ok(items)
    }
}
