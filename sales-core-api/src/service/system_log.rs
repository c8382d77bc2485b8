use std::sync::Arc;

use sales_core_db::models::SystemLogModel;
use sales_core_db::repository::{Page, PageRequest, UnitOfWork, UnitOfWorkSession};

use crate::error::ServiceResult;
use crate::scope::{role_gate, Operation, Scope};

/// Read access to the audit trail
pub struct SystemLogViewer<U> {
    store: Arc<U>,
}

impl<U: UnitOfWork> SystemLogViewer<U> {
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    pub async fn list_system_logs(
        &self,
        actor: &Scope,
        page: PageRequest,
    ) -> ServiceResult<Page<SystemLogModel>> {
        role_gate(actor, Operation::ReadSystemLog)?;
        let session = self.store.begin().await?;
        Ok(session.system_logs().list(page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core_db::models::Role;

    use crate::error::ServiceError;
    use crate::testing::*;

    #[tokio::test]
    async fn test_only_admin_reads_audit_trail() {
        let store = Arc::new(MemoryStore::new());
        let admin = seed_user(&store, "root", Role::SystemAdministrator, None).await;
        let gm = seed_user(&store, "boss", Role::GeneralManager, None).await;
        store
            .seed(|state| {
                state.system_logs.push(SystemLogModel::new(admin.id, "first"));
                state.system_logs.push(SystemLogModel::new(admin.id, "second"));
            })
            .await;
        let viewer = SystemLogViewer::new(store);

        let page = viewer
            .list_system_logs(&scope_of(&admin), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.items[0].action, "second");
        assert!(matches!(
            viewer.list_system_logs(&scope_of(&gm), PageRequest::default()).await,
            Err(ServiceError::Forbidden(_))
        ));
    }
}
