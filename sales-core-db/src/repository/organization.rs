use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::organization::{DepartmentModel, ZoneModel};
use crate::repository::{
    create_batch::CreateBatch, delete_batch::DeleteBatch, exist_by_ids::ExistByIds,
    load_batch::LoadBatch, pagination::{Page, PageRequest}, update_batch::UpdateBatch,
};

#[async_trait]
pub trait ZoneRepository:
    LoadBatch<ZoneModel>
    + CreateBatch<ZoneModel>
    + UpdateBatch<ZoneModel>
    + DeleteBatch
    + ExistByIds
{
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<ZoneModel>>;

    /// Zones ordered by name
    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<ZoneModel>>;

    /// Unset `director_id` wherever it references `user_id`. Returns the number of zones touched.
    async fn clear_director(&self, user_id: Uuid) -> RepositoryResult<u64>;
}

#[async_trait]
pub trait DepartmentRepository:
    LoadBatch<DepartmentModel>
    + CreateBatch<DepartmentModel>
    + UpdateBatch<DepartmentModel>
    + DeleteBatch
    + ExistByIds
{
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<DepartmentModel>>;

    /// Departments ordered by name, optionally restricted to one zone
    async fn list(
        &self,
        zone_id: Option<Uuid>,
        page: PageRequest,
    ) -> RepositoryResult<Page<DepartmentModel>>;

    async fn count_by_zone(&self, zone_id: Uuid) -> RepositoryResult<u64>;

    /// Unset `manager_id` wherever it references `user_id`.
    /// Returns the number of departments touched.
    async fn clear_manager(&self, user_id: Uuid) -> RepositoryResult<u64>;
}
