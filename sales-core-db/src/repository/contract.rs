use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::contract::ContractModel;
use crate::repository::{
    create_batch::CreateBatch, exist_by_ids::ExistByIds, load_batch::LoadBatch,
    ownership_filter::{AmountAggregate, DateRange, OwnershipFilter},
    pagination::{Page, PageRequest}, update_batch::UpdateBatch,
};

/// Contracts are never deleted, so this trait has no `DeleteBatch` bound.
#[async_trait]
pub trait ContractRepository:
    LoadBatch<ContractModel> + CreateBatch<ContractModel> + UpdateBatch<ContractModel> + ExistByIds
{
    /// Contracts matching `filter`, newest first
    async fn list(
        &self,
        filter: OwnershipFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<ContractModel>>;

    /// Sum and count of `amount` over contracts matching `filter`, optionally
    /// restricted to those created within `period`
    async fn aggregate_amount(
        &self,
        filter: OwnershipFilter,
        period: Option<DateRange>,
    ) -> RepositoryResult<AmountAggregate>;
}
