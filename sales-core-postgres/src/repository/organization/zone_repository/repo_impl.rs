use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use sales_core_db::models::ZoneModel;
use sales_core_db::repository::{
    DeleteBatch, ExistByIds, LoadBatch, Page, PageRequest, ZoneRepository,
};
use sales_core_db::RepositoryResult;

use crate::executor::Executor;
use crate::utils::{delete_by_ids, exist_by_ids, get_heapless_string, load_by_ids, TryFromRow};

pub(super) const TABLE: &str = "zone";

pub struct ZoneRepositoryImpl {
    pub executor: Executor,
}

impl ZoneRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ZoneModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(ZoneModel {
            id: row.try_get("id")?,
            name: get_heapless_string(row, "name")?,
            director_id: row.try_get("director_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl LoadBatch<ZoneModel> for ZoneRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<ZoneModel>>> {
        load_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl DeleteBatch for ZoneRepositoryImpl {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        delete_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl ExistByIds for ZoneRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>> {
        exist_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl ZoneRepository for ZoneRepositoryImpl {
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<ZoneModel>> {
        self.find_by_name_impl(name).await
    }

    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<ZoneModel>> {
        self.list_impl(page).await
    }

    async fn clear_director(&self, user_id: Uuid) -> RepositoryResult<u64> {
        self.clear_director_impl(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_zone};
    use sales_core_db::models::ZoneModel;
    use sales_core_db::repository::{
        CreateBatch, DeleteBatch, ExistByIds, Load, LoadBatch, UnitOfWorkSession,
    };
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_load_batch_with_non_existing(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let zones = ctx.session().zones();

        let saved = zones.create_batch(vec![test_zone()]).await?;
        let loaded = zones.load_batch(&[saved[0].id, Uuid::new_v4()]).await?;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].as_ref().map(|z| &z.name), Some(&saved[0].name));
        assert!(loaded[1].is_none());
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_delete_and_exist() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let zones = ctx.session().zones();

        let saved = zones.create_batch(vec![test_zone(), test_zone()]).await?;
        let ids: Vec<Uuid> = saved.iter().map(|z| z.id).collect();
        assert!(zones.exist_by_ids(&ids).await?.iter().all(|(_, exists)| *exists));

        assert_eq!(zones.delete_batch(&ids[..1]).await?, 1);
        let exists = zones.exist_by_ids(&ids).await?;
        assert_eq!(exists, vec![(ids[0], false), (ids[1], true)]);

        let missing: Option<ZoneModel> = zones.find(ids[0]).await?;
        assert!(missing.is_none());
        Ok(())
    }
}
