use sales_core_db::models::ZoneModel;
use sales_core_db::RepositoryResult;

use super::repo_impl::ZoneRepositoryImpl;
use crate::executor::consumed;
use crate::utils::TryFromRow;

impl ZoneRepositoryImpl {
    pub(super) async fn find_by_name_impl(
        &self,
        name: &str,
    ) -> RepositoryResult<Option<ZoneModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            sqlx::query("SELECT * FROM zone WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(ZoneModel::try_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_zone};
    use sales_core_db::repository::{CreateBatch, UnitOfWorkSession};

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_find_by_name() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let zones = ctx.session().zones();

        let zone = zones.create_batch(vec![test_zone()]).await?.remove(0);
        let found = zones.find_by_name(zone.name.as_str()).await?;
        assert_eq!(found.map(|z| z.id), Some(zone.id));

        assert!(zones.find_by_name("no-such-zone").await?.is_none());
        Ok(())
    }
}
