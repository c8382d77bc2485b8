use async_trait::async_trait;

use sales_core_db::models::DepartmentModel;
use sales_core_db::repository::CreateBatch;
use sales_core_db::RepositoryResult;

use super::repo_impl::DepartmentRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl CreateBatch<DepartmentModel> for DepartmentRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<DepartmentModel>,
    ) -> RepositoryResult<Vec<DepartmentModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO department (id, name, zone_id, manager_id, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.zone_id)
            .bind(item.manager_id)
            .bind(item.created_at)
            .execute(&mut **transaction)
            .await?;
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_department, test_zone};
    use sales_core_db::repository::{CreateBatch, UnitOfWorkSession};

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_create_in_zone() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();

        let zone = session.zones().create_batch(vec![test_zone()]).await?.remove(0);
        let saved = session
            .departments()
            .create_batch(vec![test_department(Some(&zone)), test_department(None)])
            .await?;
        assert_eq!(saved[0].zone_id, Some(zone.id));
        assert_eq!(saved[1].zone_id, None);
        Ok(())
    }
}
