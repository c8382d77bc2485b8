use async_trait::async_trait;

use sales_core_db::models::{Identifiable, UserModel};
use sales_core_db::repository::UpdateBatch;
use sales_core_db::{RepositoryError, RepositoryResult};

use super::repo_impl::UserRepositoryImpl;
use crate::executor::consumed;

#[async_trait]
impl UpdateBatch<UserModel> for UserRepositoryImpl {
    async fn update_batch(&self, items: Vec<UserModel>) -> RepositoryResult<Vec<UserModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        for item in &items {
            let result = sqlx::query(
                r#"
                UPDATE app_user
                SET username = $2, password_hash = $3, role = $4, department_id = $5, zone_id = $6
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.username.as_str())
            .bind(&item.password_hash)
            .bind(item.role)
            .bind(item.department_id)
            .bind(item.zone_id)
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::not_found(UserModel::ENTITY_NAME, item.id));
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_department, test_user};
    use sales_core_db::models::{Role, UserModel};
    use sales_core_db::repository::{CreateBatch, Load, UnitOfWorkSession, UpdateBatch};

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_promote_and_place() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();

        let department = session
            .departments()
            .create_batch(vec![test_department(None)])
            .await?
            .remove(0);
        let mut user = session
            .users()
            .create_batch(vec![test_user(Role::Default, None)])
            .await?
            .remove(0);
        user.role = Role::SalesManager;
        user.department_id = Some(department.id);
        session.users().update_batch(vec![user.clone()]).await?;

        let loaded: UserModel = session.users().load(user.id).await?;
        assert_eq!(loaded.role, Role::SalesManager);
        assert_eq!(loaded.department_id, Some(department.id));
        Ok(())
    }
}
