use sales_core_db::models::UserModel;
use sales_core_db::repository::{Page, PageRequest};
use sales_core_db::RepositoryResult;

use super::repo_impl::UserRepositoryImpl;
use crate::executor::consumed;
use crate::utils::TryFromRow;

impl UserRepositoryImpl {
    pub(super) async fn list_impl(&self, page: PageRequest) -> RepositoryResult<Page<UserModel>> {
        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_user")
                .fetch_one(&mut **transaction)
                .await?;
            let rows = sqlx::query("SELECT * FROM app_user ORDER BY username LIMIT $1 OFFSET $2")
                .bind(page.sql_limit())
                .bind(page.sql_offset())
                .fetch_all(&mut **transaction)
                .await?;
            (total, rows)
        };

        let items = rows
            .iter()
            .map(UserModel::try_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, total as usize, page))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_user};
    use sales_core_db::models::Role;
    use sales_core_db::repository::{CreateBatch, PageRequest, UnitOfWorkSession};

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_list_users() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let users = ctx.session().users();
        users
            .create_batch(vec![test_user(Role::Default, None), test_user(Role::Default, None)])
            .await?;

        let page = users.list(PageRequest::new(1, 0)).await?;
        assert_eq!(page.items.len(), 1);
        assert!(page.total >= 2);
        assert!(page.has_more());
        Ok(())
    }
}
