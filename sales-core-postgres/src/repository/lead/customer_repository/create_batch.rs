use async_trait::async_trait;

use sales_core_db::models::CustomerModel;
use sales_core_db::repository::CreateBatch;
use sales_core_db::RepositoryResult;

use super::repo_impl::CustomerRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl CreateBatch<CustomerModel> for CustomerRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<CustomerModel>,
    ) -> RepositoryResult<Vec<CustomerModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO customer (
                    id, name, phone, age, gender, address, loan_intent, is_in_public_sea,
                    saler_id, department_id, zone_id, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
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
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::super::repo_impl::test_support::owned_lead;
    use crate::test_helper::setup_test_context;
    use sales_core_db::models::INITIAL_LOAN_INTENT;
    use sales_core_db::repository::{CreateBatch, UnitOfWorkSession};
    use sales_core_db::RepositoryError;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_create_owned_lead() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let (saler, lead) = owned_lead(ctx.session()).await?;
        assert_eq!(lead.saler_id, Some(saler.id));
        assert_eq!(lead.loan_intent, INITIAL_LOAN_INTENT);
        assert!(!lead.is_in_public_sea);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_inconsistent_ownership_is_rejected(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let (_, mut lead) = owned_lead(ctx.session()).await?;
        lead.id = uuid::Uuid::new_v4();
        lead.is_in_public_sea = true;

        let err = ctx.session().customers().create_batch(vec![lead]).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
        Ok(())
    }
}
