use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use sales_core_db::repository::{AmountAggregate, DateRange, OwnershipFilter};
use sales_core_db::RepositoryResult;

use super::repo_impl::ContractRepositoryImpl;
use crate::executor::consumed;
use crate::utils::scope_column;

impl ContractRepositoryImpl {
    /// Sum and count computed by the database, over the same predicate as `list`
    pub(super) async fn aggregate_amount_impl(
        &self,
        filter: OwnershipFilter,
        period: Option<DateRange>,
    ) -> RepositoryResult<AmountAggregate> {
        let (column, id) = scope_column(filter);
        let start: Option<DateTime<Utc>> = period.map(|range| range.start);
        let end: Option<DateTime<Utc>> = period.map(|range| range.end);

        let query = format!(
            r#"
            SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
            FROM contract
            WHERE ($1::uuid IS NULL OR {column} = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at < $3)
            "#
        );

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let row = sqlx::query(&query)
            .bind(id)
            .bind(start)
            .bind(end)
            .fetch_one(&mut **transaction)
            .await?;

        Ok(AmountAggregate {
            total: row.try_get::<Decimal, _>("total")?,
            count: row.try_get("count")?,
        })
    }
}
