use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::identity::{Role, UserModel, UserProfileModel};
use crate::repository::{
    create_batch::CreateBatch, delete_batch::DeleteBatch, exist_by_ids::ExistByIds,
    load_batch::LoadBatch, pagination::{Page, PageRequest}, update_batch::UpdateBatch,
};

#[async_trait]
pub trait UserRepository:
    LoadBatch<UserModel>
    + CreateBatch<UserModel>
    + UpdateBatch<UserModel>
    + DeleteBatch
    + ExistByIds
{
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<UserModel>>;

    /// Users ordered by username
    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<UserModel>>;

    async fn count_by_role(&self, role: Role) -> RepositoryResult<u64>;

    async fn count_by_department(&self, department_id: Uuid) -> RepositoryResult<u64>;

    async fn count_by_zone(&self, zone_id: Uuid) -> RepositoryResult<u64>;

    /// Set `zone_id` of every user placed in `department_id`. Returns the number of rows touched.
    async fn set_zone_for_department(
        &self,
        department_id: Uuid,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64>;
}

#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Option<UserProfileModel>>;

    /// Insert the profile, or replace the existing profile of the same user
    async fn upsert(&self, profile: UserProfileModel) -> RepositoryResult<UserProfileModel>;

    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<bool>;
}
