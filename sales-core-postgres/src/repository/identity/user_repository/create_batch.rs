use async_trait::async_trait;

use sales_core_db::models::UserModel;
use sales_core_db::repository::CreateBatch;
use sales_core_db::RepositoryResult;

use super::repo_impl::UserRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl CreateBatch<UserModel> for UserRepositoryImpl {
    async fn create_batch(&self, items: Vec<UserModel>) -> RepositoryResult<Vec<UserModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO app_user
                    (id, username, password_hash, role, department_id, zone_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.id)
            .bind(item.username.as_str())
            .bind(&item.password_hash)
            .bind(item.role)
            .bind(item.department_id)
            .bind(item.zone_id)
            .bind(item.created_at)
            .execute(&mut **transaction)
            .await?;
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_user};
    use sales_core_db::models::Role;
    use sales_core_db::repository::{CreateBatch, UnitOfWorkSession};
    use sales_core_db::RepositoryError;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_duplicate_username_is_conflict(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let users = ctx.session().users();

        let user = test_user(Role::Default, None);
        let mut twin = test_user(Role::Default, None);
        twin.username = user.username.clone();
        users.create_batch(vec![user]).await?;

        let err = users.create_batch(vec![twin]).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        Ok(())
    }
}
