use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use sales_core_db::models::{Role, UserModel};
use sales_core_db::repository::{
    DeleteBatch, ExistByIds, LoadBatch, Page, PageRequest, UserRepository,
};
use sales_core_db::RepositoryResult;

use crate::executor::Executor;
use crate::utils::{delete_by_ids, exist_by_ids, get_heapless_string, load_by_ids, TryFromRow};

pub(super) const TABLE: &str = "app_user";

pub struct UserRepositoryImpl {
    pub executor: Executor,
}

impl UserRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for UserModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(UserModel {
            id: row.try_get("id")?,
            username: get_heapless_string(row, "username")?,
            password_hash: row.try_get("password_hash")?,
            role: row.try_get("role")?,
            department_id: row.try_get("department_id")?,
            zone_id: row.try_get("zone_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl LoadBatch<UserModel> for UserRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<UserModel>>> {
        load_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl DeleteBatch for UserRepositoryImpl {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        delete_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl ExistByIds for UserRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>> {
        exist_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<UserModel>> {
        self.find_by_username_impl(username).await
    }

    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<UserModel>> {
        self.list_impl(page).await
    }

    async fn count_by_role(&self, role: Role) -> RepositoryResult<u64> {
        self.count_where("role = $1", role).await
    }

    async fn count_by_department(&self, department_id: Uuid) -> RepositoryResult<u64> {
        self.count_where("department_id = $1", department_id).await
    }

    async fn count_by_zone(&self, zone_id: Uuid) -> RepositoryResult<u64> {
        self.count_where("zone_id = $1", zone_id).await
    }

    async fn set_zone_for_department(
        &self,
        department_id: Uuid,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        self.set_zone_for_department_impl(department_id, zone_id).await
    }
}
