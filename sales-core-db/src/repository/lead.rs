use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::lead::CustomerModel;
use crate::repository::{
    create_batch::CreateBatch, delete_batch::DeleteBatch, exist_by_ids::ExistByIds,
    load_batch::LoadBatch, ownership_filter::OwnershipFilter,
    pagination::{Page, PageRequest}, update_batch::UpdateBatch,
};

/// Storage of sales leads.
///
/// The bulk operations below each touch many rows; every row they change is
/// updated as a whole, so a concurrent reader sees either its old or its new state.
#[async_trait]
pub trait CustomerRepository:
    LoadBatch<CustomerModel>
    + CreateBatch<CustomerModel>
    + UpdateBatch<CustomerModel>
    + DeleteBatch
    + ExistByIds
{
    /// Owned leads matching `filter`, newest first
    async fn list(
        &self,
        filter: OwnershipFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<CustomerModel>>;

    /// Leads in the public sea, newest first
    async fn list_public_sea(&self, page: PageRequest) -> RepositoryResult<Page<CustomerModel>>;

    /// Decrement `loan_intent` of every lead with `0 < loan_intent <= DECAY_CEILING`.
    /// Returns the number of leads decremented.
    async fn decay_loan_intent(&self) -> RepositoryResult<u64>;

    /// Release every owned lead whose `loan_intent` is 0 to the public sea.
    /// Returns the number of leads released.
    async fn migrate_exhausted_to_public_sea(&self) -> RepositoryResult<u64>;

    async fn set_loan_intent(&self, customer_id: Uuid, loan_intent: i32) -> RepositoryResult<()>;

    /// Copy the saler's placement onto every lead they own
    async fn sync_owner_placement(
        &self,
        saler_id: Uuid,
        department_id: Option<Uuid>,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64>;

    /// Set `zone_id` of every owned lead placed in `department_id`
    async fn sync_department_zone(
        &self,
        department_id: Uuid,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64>;

    /// Release every lead owned by `saler_id` to the public sea
    async fn release_owned_by(&self, saler_id: Uuid) -> RepositoryResult<u64>;
}
