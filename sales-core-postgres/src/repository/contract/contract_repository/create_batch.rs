use async_trait::async_trait;

use sales_core_db::models::ContractModel;
use sales_core_db::repository::CreateBatch;
use sales_core_db::RepositoryResult;

use super::repo_impl::ContractRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl CreateBatch<ContractModel> for ContractRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ContractModel>,
    ) -> RepositoryResult<Vec<ContractModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO contract (
                    id, amount, service_fee, bank_amount, status, financial_product,
                    contract_document, bank_documents, customer_id, saler_id, specialist_id,
                    accountant_id, department_id, zone_id, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
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
            .bind(item.customer_id)
            .bind(item.saler_id)
            .bind(item.specialist_id)
            .bind(item.accountant_id)
            .bind(item.department_id)
            .bind(item.zone_id)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;
        }
        Ok(items)
    }
}
