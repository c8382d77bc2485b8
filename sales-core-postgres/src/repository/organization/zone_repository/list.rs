use sales_core_db::models::ZoneModel;
use sales_core_db::repository::{Page, PageRequest};
use sales_core_db::RepositoryResult;

use super::repo_impl::ZoneRepositoryImpl;
use crate::executor::consumed;
use crate::utils::TryFromRow;

impl ZoneRepositoryImpl {
    pub(super) async fn list_impl(&self, page: PageRequest) -> RepositoryResult<Page<ZoneModel>> {
        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM zone")
                .fetch_one(&mut **transaction)
                .await?;
            let rows = sqlx::query("SELECT * FROM zone ORDER BY name LIMIT $1 OFFSET $2")
                .bind(page.sql_limit())
                .bind(page.sql_offset())
                .fetch_all(&mut **transaction)
                .await?;
            (total, rows)
        };

        let items = rows
            .iter()
            .map(ZoneModel::try_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, total as usize, page))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_zone};
    use sales_core_db::repository::{CreateBatch, PageRequest, UnitOfWorkSession};

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_list_pages_by_name() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let zones = ctx.session().zones();
        zones.create_batch(vec![test_zone(), test_zone(), test_zone()]).await?;

        let first = zones.list(PageRequest::new(2, 0)).await?;
        assert_eq!(first.items.len(), 2);
        assert!(first.total >= 3);
        assert!(first.items[0].name <= first.items[1].name);

        let beyond = zones.list(PageRequest::new(2, first.total)).await?;
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, first.total);
        Ok(())
    }
}
