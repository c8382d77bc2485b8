use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use sales_core_db::models::CustomerModel;
use sales_core_db::repository::{
    CustomerRepository, DeleteBatch, ExistByIds, LoadBatch, OwnershipFilter, Page, PageRequest,
};
use sales_core_db::RepositoryResult;

use crate::executor::Executor;
use crate::utils::{delete_by_ids, exist_by_ids, get_heapless_string, load_by_ids, TryFromRow};

pub(super) const TABLE: &str = "customer";

pub struct CustomerRepositoryImpl {
    pub executor: Executor,
}

impl CustomerRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for CustomerModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(CustomerModel {
            id: row.try_get("id")?,
            name: get_heapless_string(row, "name")?,
            phone: get_heapless_string(row, "phone")?,
            age: row.try_get("age")?,
            gender: row.try_get("gender")?,
            address: row.try_get("address")?,
            loan_intent: row.try_get("loan_intent")?,
            is_in_public_sea: row.try_get("is_in_public_sea")?,
            saler_id: row.try_get("saler_id")?,
            department_id: row.try_get("department_id")?,
            zone_id: row.try_get("zone_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl LoadBatch<CustomerModel> for CustomerRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<CustomerModel>>> {
        load_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl DeleteBatch for CustomerRepositoryImpl {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        delete_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl ExistByIds for CustomerRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>> {
        exist_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl CustomerRepository for CustomerRepositoryImpl {
    async fn list(
        &self,
        filter: OwnershipFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<CustomerModel>> {
        self.list_impl(filter, page).await
    }

    async fn list_public_sea(&self, page: PageRequest) -> RepositoryResult<Page<CustomerModel>> {
        self.list_public_sea_impl(page).await
    }

    async fn decay_loan_intent(&self) -> RepositoryResult<u64> {
        self.decay_loan_intent_impl().await
    }

    async fn migrate_exhausted_to_public_sea(&self) -> RepositoryResult<u64> {
        self.migrate_exhausted_impl().await
    }

    async fn set_loan_intent(&self, customer_id: Uuid, loan_intent: i32) -> RepositoryResult<()> {
        self.set_loan_intent_impl(customer_id, loan_intent).await
    }

    async fn sync_owner_placement(
        &self,
        saler_id: Uuid,
        department_id: Option<Uuid>,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        self.sync_owner_placement_impl(saler_id, department_id, zone_id).await
    }

    async fn sync_department_zone(
        &self,
        department_id: Uuid,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        self.sync_department_zone_impl(department_id, zone_id).await
    }

    async fn release_owned_by(&self, saler_id: Uuid) -> RepositoryResult<u64> {
        self.release_owned_by_impl(saler_id).await
    }
}
