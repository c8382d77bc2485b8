use uuid::Uuid;

use sales_core_db::models::{CustomerModel, Identifiable, DECAY_CEILING};
use sales_core_db::{RepositoryError, RepositoryResult};

use super::repo_impl::CustomerRepositoryImpl;
use crate::executor::consumed;

impl CustomerRepositoryImpl {
    /// One decay step over every lead inside the decay window
    pub(super) async fn decay_loan_intent_impl(&self) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query(
            r#"
            UPDATE customer
            SET loan_intent = loan_intent - 1, updated_at = NOW()
            WHERE loan_intent > 0 AND loan_intent <= $1
            "#,
        )
        .bind(DECAY_CEILING)
        .execute(&mut **transaction)
        .await?;
        Ok(result.rows_affected())
    }

    /// Release every owned lead whose loan intent is exhausted
    pub(super) async fn migrate_exhausted_impl(&self) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query(
            r#"
            UPDATE customer
            SET is_in_public_sea = TRUE, saler_id = NULL, department_id = NULL, zone_id = NULL,
                updated_at = NOW()
            WHERE loan_intent = 0 AND NOT is_in_public_sea
            "#,
        )
        .execute(&mut **transaction)
        .await?;
        Ok(result.rows_affected())
    }

    pub(super) async fn set_loan_intent_impl(
        &self,
        customer_id: Uuid,
        loan_intent: i32,
    ) -> RepositoryResult<()> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query(
            "UPDATE customer SET loan_intent = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(customer_id)
        .bind(loan_intent)
        .execute(&mut **transaction)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(CustomerModel::ENTITY_NAME, customer_id));
        }
        Ok(())
    }
}
