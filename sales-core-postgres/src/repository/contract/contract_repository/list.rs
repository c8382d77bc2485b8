use sales_core_db::models::ContractModel;
use sales_core_db::repository::{OwnershipFilter, Page, PageRequest};
use sales_core_db::RepositoryResult;

use super::repo_impl::ContractRepositoryImpl;
use crate::executor::consumed;
use crate::utils::{scope_column, TryFromRow};

impl ContractRepositoryImpl {
    pub(super) async fn list_impl(
        &self,
        filter: OwnershipFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<ContractModel>> {
        let (column, id) = scope_column(filter);
        let predicate = format!("($1::uuid IS NULL OR {column} = $1)");

        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            let total: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM contract WHERE {predicate}"))
                    .bind(id)
                    .fetch_one(&mut **transaction)
                    .await?;
            let rows = sqlx::query(&format!(
                "SELECT * FROM contract WHERE {predicate} \
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
            .map(ContractModel::try_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, total as usize, page))
    }
}
