use sales_core_db::models::CustomerModel;
use sales_core_db::repository::{OwnershipFilter, Page, PageRequest};
use sales_core_db::RepositoryResult;

use super::repo_impl::CustomerRepositoryImpl;
use crate::executor::consumed;
use crate::utils::{scope_column, TryFromRow};

impl CustomerRepositoryImpl {
    /// Owned leads matching `filter`, newest first
    pub(super) async fn list_impl(
        &self,
        filter: OwnershipFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<CustomerModel>> {
        if let OwnershipFilter::Specialist(_) = filter {
            return Ok(Page::new(Vec::new(), 0, page));
        }
        let (column, id) = scope_column(filter);
        let predicate = format!("NOT is_in_public_sea AND ($1::uuid IS NULL OR {column} = $1)");

        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            let total: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM customer WHERE {predicate}"))
                    .bind(id)
                    .fetch_one(&mut **transaction)
                    .await?;
            let rows = sqlx::query(&format!(
                "SELECT * FROM customer WHERE {predicate} \
                 ORDER BY created_at DESC, id LIMIT $2 OFFSET $3"
            ))
            .bind(id)
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(&mut **transaction)
            .await?;
            (total, rows)
        };

        let items = rows
            .iter()
            .map(CustomerModel::try_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, total as usize, page))
    }

    pub(super) async fn list_public_sea_impl(
        &self,
        page: PageRequest,
    ) -> RepositoryResult<Page<CustomerModel>> {
        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM customer WHERE is_in_public_sea")
                    .fetch_one(&mut **transaction)
                    .await?;
            let rows = sqlx::query(
                r#"
                SELECT * FROM customer
                WHERE is_in_public_sea
                ORDER BY created_at DESC, id
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(&mut **transaction)
            .await?;
            (total, rows)
        };

        let items = rows
            .iter()
            .map(CustomerModel::try_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, total as usize, page))
    }
}
