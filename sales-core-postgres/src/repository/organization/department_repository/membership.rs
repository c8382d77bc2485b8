use uuid::Uuid;

use sales_core_db::RepositoryResult;

use super::repo_impl::DepartmentRepositoryImpl;
use crate::executor::consumed;
use crate::utils::to_count;

impl DepartmentRepositoryImpl {
    pub(super) async fn count_by_zone_impl(&self, zone_id: Uuid) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM department WHERE zone_id = $1")
            .bind(zone_id)
            .fetch_one(&mut **transaction)
            .await?;
        Ok(to_count(count))
    }

    pub(super) async fn clear_manager_impl(&self, user_id: Uuid) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query("UPDATE department SET manager_id = NULL WHERE manager_id = $1")
            .bind(user_id)
            .execute(&mut **transaction)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_department, test_user, test_zone};
    use sales_core_db::models::{DepartmentModel, Role};
    use sales_core_db::repository::{CreateBatch, Load, UnitOfWorkSession, UpdateBatch};

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_count_by_zone() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();

        let zone = session.zones().create_batch(vec![test_zone()]).await?.remove(0);
        assert_eq!(session.departments().count_by_zone(zone.id).await?, 0);
        session
            .departments()
            .create_batch(vec![test_department(Some(&zone)), test_department(Some(&zone))])
            .await?;
        assert_eq!(session.departments().count_by_zone(zone.id).await?, 2);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_clear_manager() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();

        let mut department = session
            .departments()
            .create_batch(vec![test_department(None)])
            .await?
            .remove(0);
        let manager = test_user(Role::SalesManager, Some(&department));
        session.users().create_batch(vec![manager.clone()]).await?;
        department.manager_id = Some(manager.id);
        session.departments().update_batch(vec![department.clone()]).await?;

        assert_eq!(session.departments().clear_manager(manager.id).await?, 1);
        let reloaded: DepartmentModel = session.departments().load(department.id).await?;
        assert_eq!(reloaded.manager_id, None);
        Ok(())
    }
}
