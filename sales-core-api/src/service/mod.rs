pub mod contract_workflow;
pub mod identity;
pub mod lead_ledger;
pub mod organization;
pub mod reporting;
pub mod system_log;
pub mod work_log;

pub use contract_workflow::*;
pub use identity::*;
pub use lead_ledger::*;
pub use organization::*;
pub use reporting::*;
pub use system_log::*;
pub use work_log::*;

use heapless::String as HeaplessString;
use sales_core_db::repository::{UnitOfWork, UnitOfWorkSession};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{CredentialService, TokenService};
use crate::error::{ServiceError, ServiceResult};

/// Append the audit entry of the operation running in `session`.
///
/// The entry commits or rolls back together with the change it describes.
pub(crate) async fn audit<S: UnitOfWorkSession>(
    session: &S,
    actor_id: Uuid,
    action: impl AsRef<str>,
) -> ServiceResult<()> {
    session.system_logs().record(actor_id, action.as_ref()).await?;
    Ok(())
}

/// Trim `value` and fit it into a bounded string, rejecting empty input
pub(crate) fn required_text<const N: usize>(
    field: &str,
    value: &str,
) -> ServiceResult<HeaplessString<N>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    HeaplessString::try_from(trimmed)
        .map_err(|_| ServiceError::Validation(format!("{field} is longer than {N} bytes")))
}

/// Every component of the core, sharing one store handle
pub struct SalesCore<U> {
    pub organization: OrganizationDirectory<U>,
    pub identity: IdentityRegistry<U>,
    pub leads: LeadLedger<U>,
    pub contracts: ContractWorkflow<U>,
    pub reports: PerformanceReports<U>,
    pub work_logs: WorkLogBook<U>,
    pub system_logs: SystemLogViewer<U>,
}

impl<U: UnitOfWork> SalesCore<U> {
    pub fn new(
        store: Arc<U>,
        credentials: Arc<dyn CredentialService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            organization: OrganizationDirectory::new(store.clone()),
            identity: IdentityRegistry::new(store.clone(), credentials, tokens),
            leads: LeadLedger::new(store.clone()),
            contracts: ContractWorkflow::new(store.clone()),
            reports: PerformanceReports::new(store.clone()),
            work_logs: WorkLogBook::new(store.clone()),
            system_logs: SystemLogViewer::new(store),
        }
    }
}
