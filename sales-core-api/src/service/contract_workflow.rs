use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use sales_core_db::models::{ContractModel, ContractStatus, CustomerModel, Role, UserModel};
use sales_core_db::repository::{Load, Page, PageRequest, UnitOfWork, UnitOfWorkSession};

use crate::error::{ServiceError, ServiceResult};
use crate::scope::{authorize, filter, role_gate, Operation, ResourceOwner, Scope};
use crate::service::lead_ledger::mark_converted;
use crate::service::organization::first;
use crate::service::audit;

/// Monetary fields of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContractAmounts {
    pub amount: Decimal,
    pub service_fee: Decimal,
    pub bank_amount: Decimal,
}

impl ContractAmounts {
    fn validate(&self) -> ServiceResult<()> {
        if self.amount.is_sign_negative()
            || self.service_fee.is_sign_negative()
            || self.bank_amount.is_sign_negative()
        {
            return Err(ServiceError::Validation("contract amounts must not be negative".into()));
        }
        Ok(())
    }
}

/// Input of `submit_contract`
#[derive(Debug, Clone)]
pub struct NewContract {
    pub customer_id: Uuid,
    pub amounts: ContractAmounts,
    pub financial_product: Option<String>,
    pub contract_document: Option<String>,
    pub bank_documents: Option<String>,
    pub specialist_id: Uuid,
    pub accountant_id: Uuid,
}

/// Loan contracts from submission through approval or rejection
pub struct ContractWorkflow<U> {
    store: Arc<U>,
}

impl<U: UnitOfWork> ContractWorkflow<U> {
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    /// Open a contract for a lead in the actor's reach. The actor becomes
    /// the saler and their current department and zone are recorded on the
    /// contract for good.
    pub async fn submit_contract(
        &self,
        actor: &Scope,
        input: NewContract,
    ) -> ServiceResult<ContractModel> {
        role_gate(actor, Operation::SubmitContract)?;
        input.amounts.validate()?;

        let session = self.store.begin().await?;
        let customer: CustomerModel = session.customers().load(input.customer_id).await?;
        authorize(actor, Operation::SubmitContract, &ResourceOwner::of_customer(&customer))?;

        let specialist: UserModel = session.users().load(input.specialist_id).await?;
        if !matches!(specialist.role, Role::FinanceSpecialist | Role::FinanceManager) {
            return Err(ServiceError::InvalidState(format!(
                "user {} cannot review contracts",
                specialist.username
            )));
        }
        let accountant: UserModel = session.users().load(input.accountant_id).await?;
        if accountant.role != Role::Accountant {
            return Err(ServiceError::InvalidState(format!(
                "user {} is not an accountant",
                accountant.username
            )));
        }
        let saler: UserModel = session.users().load(actor.user_id).await?;

        let now = chrono::Utc::now();
        let contract = ContractModel {
            id: Uuid::new_v4(),
            amount: input.amounts.amount,
            service_fee: input.amounts.service_fee,
            bank_amount: input.amounts.bank_amount,
            status: ContractStatus::New,
            financial_product: input.financial_product,
            contract_document: input.contract_document,
            bank_documents: input.bank_documents,
            customer_id: customer.id,
            saler_id: saler.id,
            specialist_id: specialist.id,
            accountant_id: accountant.id,
            department_id: saler.department_id,
            zone_id: saler.zone_id,
            created_at: now,
            updated_at: now,
        };

        let contract = first(session.contracts().create_batch(vec![contract]).await?)?;
        audit(
            &session,
            actor.user_id,
            format!("submitted contract {} for customer {}", contract.id, customer.name),
        )
        .await?;
        session.commit().await?;

        info!(
            contract_id = %contract.id,
            customer_id = %customer.id,
            amount = %contract.amount,
            "contract submitted"
        );
        Ok(contract)
    }

    /// Move a contract forward. Finance may decide straight from `New`;
    /// `Approved` and `Rejected` are final. Approval marks the lead converted.
    pub async fn update_contract_status(
        &self,
        actor: &Scope,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> ServiceResult<ContractModel> {
        role_gate(actor, Operation::UpdateContractStatus)?;
        if status == ContractStatus::New {
            return Err(ServiceError::InvalidState("a contract cannot be moved back to New".into()));
        }

        let session = self.store.begin().await?;
        let mut contract: ContractModel = session.contracts().load(contract_id).await?;
        authorize(actor, Operation::UpdateContractStatus, &ResourceOwner::of_contract(&contract))?;
        if !contract.status.can_transition_to(status) {
            return Err(ServiceError::InvalidState(format!(
                "contract {} cannot move from {} to {}",
                contract.id, contract.status, status
            )));
        }

        let previous = contract.status;
        contract.status = status;
        contract.updated_at = chrono::Utc::now();
        let contract = first(session.contracts().update_batch(vec![contract]).await?)?;
        if status == ContractStatus::Approved {
            mark_converted(&session, contract.customer_id).await?;
        }
        audit(
            &session,
            actor.user_id,
            format!("changed contract {} status from {} to {}", contract.id, previous, status),
        )
        .await?;
        session.commit().await?;

        info!(contract_id = %contract.id, %previous, %status, "contract status updated");
        Ok(contract)
    }

    /// Rewrite the monetary fields. Status is never touched here.
    pub async fn update_contract_amount(
        &self,
        actor: &Scope,
        contract_id: Uuid,
        amounts: ContractAmounts,
    ) -> ServiceResult<ContractModel> {
        role_gate(actor, Operation::UpdateContractAmount)?;
        amounts.validate()?;

        let session = self.store.begin().await?;
        let mut contract: ContractModel = session.contracts().load(contract_id).await?;
        authorize(actor, Operation::UpdateContractAmount, &ResourceOwner::of_contract(&contract))?;

        contract.amount = amounts.amount;
        contract.service_fee = amounts.service_fee;
        contract.bank_amount = amounts.bank_amount;
        contract.updated_at = chrono::Utc::now();
        let contract = first(session.contracts().update_batch(vec![contract]).await?)?;
        audit(
            &session,
            actor.user_id,
            format!("updated amounts of contract {}", contract.id),
        )
        .await?;
        session.commit().await?;

        Ok(contract)
    }

    pub async fn get_contract(
        &self,
        actor: &Scope,
        contract_id: Uuid,
    ) -> ServiceResult<ContractModel> {
        role_gate(actor, Operation::ReadContract)?;
        let session = self.store.begin().await?;
        let contract: ContractModel = session.contracts().load(contract_id).await?;
        authorize(actor, Operation::ReadContract, &ResourceOwner::of_contract(&contract))?;
        Ok(contract)
    }

    pub async fn list_contracts(
        &self,
        actor: &Scope,
        page: PageRequest,
    ) -> ServiceResult<Page<ContractModel>> {
        let filter = filter(actor, Operation::ReadContract)?;
        let session = self.store.begin().await?;
        Ok(session.contracts().list(filter, page).await?)
    }
}
