use sqlx::{Encode, Postgres, Type};

use sales_core_db::RepositoryResult;

use super::repo_impl::UserRepositoryImpl;
use crate::executor::consumed;
use crate::utils::to_count;

impl UserRepositoryImpl {
    /// `SELECT COUNT(*)` over users matching `predicate`, which binds `$1`
    pub(super) async fn count_where<V>(
        &self,
        predicate: &'static str,
        value: V,
    ) -> RepositoryResult<u64>
    where
        V: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send,
    {
        let query = format!("SELECT COUNT(*) FROM app_user WHERE {predicate}");
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let count: i64 = sqlx::query_scalar(&query)
            .bind(value)
            .fetch_one(&mut **transaction)
            .await?;
        Ok(to_count(count))
    }
}
