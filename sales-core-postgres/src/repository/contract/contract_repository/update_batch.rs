use async_trait::async_trait;

use sales_core_db::models::{ContractModel, Identifiable};
use sales_core_db::repository::UpdateBatch;
use sales_core_db::{RepositoryError, RepositoryResult};

use super::repo_impl::ContractRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl UpdateBatch<ContractModel> for ContractRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<ContractModel>,
    ) -> RepositoryResult<Vec<ContractModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            // Ownership and placement are fixed at submission.
            let result = sqlx::query(
                r#"
                UPDATE contract
                SET amount = $2, service_fee = $3, bank_amount = $4, status = $5,
                    financial_product = $6, contract_document = $7, bank_documents = $8,
                    specialist_id = $9, accountant_id = $10, updated_at = $11
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.amount)
            .bind(item.service_fee)
            .bind(item.bank_amount)
            .bind(item.status)
            .bind(item.financial_product.as_deref())
            .bind(item.contract_document.as_deref())
            .bind(item.bank_documents.as_deref())
            .bind(item.specialist_id)
            .bind(item.accountant_id)
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::not_found(ContractModel::ENTITY_NAME, item.id));
            }
        }
        Ok(items)
    }
}
