use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use sales_core_db::models::ContractModel;
use sales_core_db::repository::{
    AmountAggregate, ContractRepository, DateRange, ExistByIds, LoadBatch, OwnershipFilter, Page,
    PageRequest,
};
use sales_core_db::RepositoryResult;

use crate::executor::Executor;
use crate::utils::{exist_by_ids, load_by_ids, TryFromRow};

pub(super) const TABLE: &str = "contract";

pub struct ContractRepositoryImpl {
    pub executor: Executor,
}

impl ContractRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ContractModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(ContractModel {
            id: row.try_get("id")?,
            amount: row.try_get("amount")?,
            service_fee: row.try_get("service_fee")?,
            bank_amount: row.try_get("bank_amount")?,
            status: row.try_get("status")?,
            financial_product: row.try_get("financial_product")?,
            contract_document: row.try_get("contract_document")?,
            bank_documents: row.try_get("bank_documents")?,
            customer_id: row.try_get("customer_id")?,
            saler_id: row.try_get("saler_id")?,
            specialist_id: row.try_get("specialist_id")?,
            accountant_id: row.try_get("accountant_id")?,
            department_id: row.try_get("department_id")?,
            zone_id: row.try_get("zone_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl LoadBatch<ContractModel> for ContractRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<ContractModel>>> {
        load_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl ExistByIds for ContractRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>> {
        exist_by_ids(&self.executor, TABLE, ids).await
    }
}

#[async_trait]
impl ContractRepository for ContractRepositoryImpl {
    async fn list(
        &self,
        filter: OwnershipFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<ContractModel>> {
        self.list_impl(filter, page).await
    }

    async fn aggregate_amount(
        &self,
        filter: OwnershipFilter,
        period: Option<DateRange>,
    ) -> RepositoryResult<AmountAggregate> {
        self.aggregate_amount_impl(filter, period).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sales_core_db::models::{CustomerModel, Role, UserModel};
    use sales_core_db::repository::{CreateBatch, UnitOfWorkSession};

    use crate::postgres_repositories::PostgresSession;
    use crate::test_helper::{test_customer, test_department, test_user, test_zone};

    /// A placed saler and one lead they own
    pub(crate) async fn saler_with_lead(
        session: &PostgresSession,
    ) -> Result<(UserModel, CustomerModel), Box<dyn std::error::Error + Send + Sync>> {
        let zone = session.zones().create_batch(vec![test_zone()]).await?.remove(0);
        let department = session
            .departments()
            .create_batch(vec![test_department(Some(&zone))])
            .await?
            .remove(0);
        let saler = session
            .users()
            .create_batch(vec![test_user(Role::SalesManager, Some(&department))])
            .await?
            .remove(0);
        let lead = session
            .customers()
            .create_batch(vec![test_customer(&saler)])
            .await?
            .remove(0);
        Ok((saler, lead))
    }
}
