use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use sales_core_db::models::DepartmentModel;
use sales_core_db::repository::{
    DeleteBatch, DepartmentRepository, ExistByIds, LoadBatch, Page, PageRequest,
};
use sales_core_db::RepositoryResult;

use crate::executor::Executor;
use crate::utils::{delete_by_ids, exist_by_ids, get_heapless_string, load_by_ids, TryFromRow};

pub(super) const TABLE: &str = "department";

pub struct DepartmentRepositoryImpl {
    pub executor: Executor,
}

impl DepartmentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for DepartmentModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(DepartmentModel {
            id: row.try_get("id")?,
            name: get_heapless_string(row, "name")?,
            zone_id: row.try_get("zone_id")?,
            manager_id: row.try_get("manager_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl LoadBatch<DepartmentModel> for DepartmentRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<DepartmentModel>>> {
        load_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl DeleteBatch for DepartmentRepositoryImpl {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        delete_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl ExistByIds for DepartmentRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>> {
        exist_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl DepartmentRepository for DepartmentRepositoryImpl {
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<DepartmentModel>> {
        self.find_by_name_impl(name).await
    }

    async fn list(
        &self,
        zone_id: Option<Uuid>,
        page: PageRequest,
    ) -> RepositoryResult<Page<DepartmentModel>> {
        self.list_impl(zone_id, page).await
    }

    async fn count_by_zone(&self, zone_id: Uuid) -> RepositoryResult<u64> {
        self.count_by_zone_impl(zone_id).await
    }

    async fn clear_manager(&self, user_id: Uuid) -> RepositoryResult<u64> {
        self.clear_manager_impl(user_id).await
    }
}
