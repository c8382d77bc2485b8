#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sales_core_api::auth::{BcryptCredentialService, Credentials, JwtTokenService};
use sales_core_api::scheduler::LifecycleScheduler;
use sales_core_api::testing::MemoryStore;
use sales_core_api::{SalesCore, Scope};
use sales_core_db::models::{DepartmentModel, Role, UserModel};

pub const PASSWORD: &str = "Passw0rd!";

/// A core wired to a fresh in-memory store with a bootstrapped administrator
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub core: SalesCore<MemoryStore>,
    pub admin: Scope,
}

impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let core = SalesCore::new(
            store.clone(),
            Arc::new(BcryptCredentialService::new(4)),
            Arc::new(JwtTokenService::new("scenario-secret", chrono::Duration::minutes(30))),
        );
        core.identity
            .bootstrap_administrator(Credentials::new("root", PASSWORD))
            .await
            .expect("bootstrap administrator");
        let admin = login(&core, "root").await;
        Self { store, core, admin }
    }

    pub fn scheduler(&self) -> LifecycleScheduler<MemoryStore> {
        LifecycleScheduler::new(self.store.clone(), Duration::from_secs(86_400))
    }

    /// Register `username`, grant `role` and place them in `department`
    pub async fn hire(
        &self,
        username: &str,
        role: Role,
        department: Option<&DepartmentModel>,
    ) -> UserModel {
        let user = self
            .core
            .identity
            .register_user(Credentials::new(username, PASSWORD), None)
            .await
            .expect("register user");
        let mut user = self
            .core
            .identity
            .update_user_role(&self.admin, user.id, role)
            .await
            .expect("grant role");
        if let Some(department) = department {
            user = self
                .core
                .organization
                .place_user_in_department(&self.admin, user.id, department.id)
                .await
                .expect("place user");
        }
        user
    }

    /// Every lead is either owned or in the public sea with no placement
    pub async fn leads_consistent(&self) -> bool {
        self.store
            .snapshot()
            .await
            .customers
            .values()
            .all(|c| c.ownership_is_consistent())
    }

    /// Scope of `username` as resolved from a freshly issued token
    pub async fn scope(&self, username: &str) -> Scope {
        login(&self.core, username).await
    }
}

async fn login(core: &SalesCore<MemoryStore>, username: &str) -> Scope {
    let outcome = core.identity.login(username, PASSWORD).await.expect("login");
    core.identity.authenticate(&outcome.token).await.expect("authenticate")
}
