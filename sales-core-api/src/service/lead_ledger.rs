use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use sales_core_db::models::{
    CustomerModel, Gender, UserModel, CONVERTED_LOAN_INTENT, INITIAL_LOAN_INTENT,
};
use sales_core_db::repository::{Load, Page, PageRequest, UnitOfWork, UnitOfWorkSession};

use crate::error::{ServiceError, ServiceResult};
use crate::scope::{authorize, covers, filter, role_gate, Operation, ResourceOwner, Scope};
use crate::service::organization::first;
use crate::service::{audit, required_text};

/// Input of `create_customer`
#[derive(Debug, Clone, Default, Validate)]
pub struct NewCustomer {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i16>,
    pub gender: Option<Gender>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }
}

/// Descriptive fields of a lead. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Validate)]
pub struct CustomerUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i16>,
    pub gender: Option<Gender>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

/// Ownership of sales leads and the public sea.
///
/// Loan intent is never set directly through this API; it changes through
/// the lifecycle scheduler, claims and contract approval only.
pub struct LeadLedger<U> {
    store: Arc<U>,
}

impl<U: UnitOfWork> LeadLedger<U> {
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    /// New lead owned by the actor and placed in the actor's department and zone
    pub async fn create_customer(
        &self,
        actor: &Scope,
        input: NewCustomer,
    ) -> ServiceResult<CustomerModel> {
        authorize(actor, Operation::CreateCustomer, &ResourceOwner::of_scope(actor))?;
        input.validate()?;

        let session = self.store.begin().await?;
        let owner: UserModel = session.users().load(actor.user_id).await?;
        let mut customer = CustomerModel::new(
            required_text("name", &input.name)?,
            required_text("phone", &input.phone)?,
            owner.id,
            owner.department_id,
            owner.zone_id,
        );
        customer.age = input.age;
        customer.gender = input.gender;
        customer.address = input.address;

        let customer = first(session.customers().create_batch(vec![customer]).await?)?;
        audit(&session, actor.user_id, format!("created customer {}", customer.name)).await?;
        session.commit().await?;

        info!(customer_id = %customer.id, saler_id = %owner.id, "customer created");
        Ok(customer)
    }

    pub async fn get_customer(
        &self,
        actor: &Scope,
        customer_id: Uuid,
    ) -> ServiceResult<CustomerModel> {
        let session = self.store.begin().await?;
        let customer: CustomerModel = session.customers().load(customer_id).await?;
        if customer.is_in_public_sea {
            role_gate(actor, Operation::ReadPublicSea)?;
        } else {
            authorize(actor, Operation::ReadCustomer, &ResourceOwner::of_customer(&customer))?;
        }
        Ok(customer)
    }

    /// Change descriptive fields. Ownership and loan intent are left alone.
    pub async fn update_customer(
        &self,
        actor: &Scope,
        customer_id: Uuid,
        update: CustomerUpdate,
    ) -> ServiceResult<CustomerModel> {
        role_gate(actor, Operation::UpdateCustomer)?;
        update.validate()?;

        let session = self.store.begin().await?;
        let mut customer: CustomerModel = session.customers().load(customer_id).await?;
        authorize(actor, Operation::UpdateCustomer, &ResourceOwner::of_customer(&customer))?;

        if let Some(name) = &update.name {
            customer.name = required_text("name", name)?;
        }
        if let Some(phone) = &update.phone {
            customer.phone = required_text("phone", phone)?;
        }
        if update.age.is_some() {
            customer.age = update.age;
        }
        if update.gender.is_some() {
            customer.gender = update.gender;
        }
        if update.address.is_some() {
            customer.address = update.address;
        }
        customer.updated_at = chrono::Utc::now();

        let customer = first(session.customers().update_batch(vec![customer]).await?)?;
        audit(&session, actor.user_id, format!("updated customer {}", customer.name)).await?;
        session.commit().await?;

        Ok(customer)
    }

    /// Owned leads visible to the actor
    pub async fn list_customers(
        &self,
        actor: &Scope,
        page: PageRequest,
    ) -> ServiceResult<Page<CustomerModel>> {
        let filter = filter(actor, Operation::ReadCustomer)?;
        let session = self.store.begin().await?;
        Ok(session.customers().list(filter, page).await?)
    }

    pub async fn list_public_sea(
        &self,
        actor: &Scope,
        page: PageRequest,
    ) -> ServiceResult<Page<CustomerModel>> {
        role_gate(actor, Operation::ReadPublicSea)?;
        let session = self.store.begin().await?;
        Ok(session.customers().list_public_sea(page).await?)
    }

    /// Reassign an owned lead to `new_saler_id`, or release it to the public
    /// sea when `None`.
    ///
    /// Both the current owner and the new saler must lie within the actor's
    /// reach. A lead already in the public sea has to be claimed instead.
    pub async fn migrate_customer(
        &self,
        actor: &Scope,
        customer_id: Uuid,
        new_saler_id: Option<Uuid>,
    ) -> ServiceResult<CustomerModel> {
        let reach = role_gate(actor, Operation::MigrateCustomer)?;

        let session = self.store.begin().await?;
        let mut customer: CustomerModel = session.customers().load(customer_id).await?;
        if customer.is_in_public_sea {
            return Err(ServiceError::InvalidState(format!(
                "customer {} is in the public sea and must be claimed",
                customer.id
            )));
        }
        if !covers(actor, reach, &ResourceOwner::of_customer(&customer)) {
            return Err(ServiceError::Forbidden(format!(
                "customer {} is outside the actor's reach",
                customer.id
            )));
        }
        let previous_saler = customer.saler_id;

        let action = match new_saler_id {
            Some(new_saler_id) => {
                let saler: UserModel = session.users().load(new_saler_id).await?;
                if !saler.role.is_sales() {
                    return Err(ServiceError::InvalidState(format!(
                        "user {} does not hold a sales role",
                        saler.username
                    )));
                }
                if !covers(actor, reach, &ResourceOwner::of_user(&saler)) {
                    return Err(ServiceError::Forbidden(format!(
                        "saler {} is outside the actor's reach",
                        saler.username
                    )));
                }
                customer.assign_to(saler.id, saler.department_id, saler.zone_id);
                format!("migrated customer {} to {}", customer.name, saler.username)
            }
            None => {
                customer.release_to_public_sea();
                format!("released customer {} to the public sea", customer.name)
            }
        };

        let customer = first(session.customers().update_batch(vec![customer]).await?)?;
        audit(&session, actor.user_id, action).await?;
        session.commit().await?;

        info!(
            customer_id = %customer.id,
            from = ?previous_saler,
            to = ?customer.saler_id,
            "customer migrated"
        );
        Ok(customer)
    }

    /// Take a public-sea lead for the actor.
    ///
    /// An exhausted interest window reopens at the initial loan intent; a
    /// converted lead keeps its intent and still never decays.
    pub async fn claim_customer(
        &self,
        actor: &Scope,
        customer_id: Uuid,
    ) -> ServiceResult<CustomerModel> {
        authorize(actor, Operation::ClaimCustomer, &ResourceOwner::of_scope(actor))?;

        let session = self.store.begin().await?;
        let mut customer: CustomerModel = session.customers().load(customer_id).await?;
        if customer.is_owned_by(actor.user_id) {
            return Ok(customer);
        }
        if !customer.is_in_public_sea {
            return Err(ServiceError::InvalidState(format!(
                "customer {} is owned by another saler",
                customer.id
            )));
        }

        let owner: UserModel = session.users().load(actor.user_id).await?;
        customer.assign_to(owner.id, owner.department_id, owner.zone_id);
        if customer.loan_intent < INITIAL_LOAN_INTENT {
            customer.loan_intent = INITIAL_LOAN_INTENT;
        }

        let customer = first(session.customers().update_batch(vec![customer]).await?)?;
        audit(&session, actor.user_id, format!("claimed customer {}", customer.name)).await?;
        session.commit().await?;

        info!(
            customer_id = %customer.id,
            saler_id = %owner.id,
            "customer claimed from public sea"
        );
        Ok(customer)
    }
}

/// Mark the lead of an approved contract as converted so it never decays
/// again. Runs inside the caller's session.
pub(crate) async fn mark_converted<S: UnitOfWorkSession>(
    session: &S,
    customer_id: Uuid,
) -> ServiceResult<()> {
    session
        .customers()
        .set_loan_intent(customer_id, CONVERTED_LOAN_INTENT)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core_db::models::{DepartmentModel, Role, ZoneModel};

    use crate::scheduler::LifecycleScheduler;
    use crate::testing::*;

    struct Ledger {
        store: Arc<MemoryStore>,
        ledger: LeadLedger<MemoryStore>,
        north: ZoneModel,
        alpha: DepartmentModel,
        beta: DepartmentModel,
    }

    async fn ledger() -> Ledger {
        let store = Arc::new(MemoryStore::new());
        let north = seed_zone(&store, "North").await;
        let alpha = seed_department(&store, "Alpha", Some(&north)).await;
        let beta = seed_department(&store, "Beta", Some(&north)).await;
        Ledger {
            ledger: LeadLedger::new(store.clone()),
            store,
            north,
            alpha,
            beta,
        }
    }

    #[tokio::test]
    async fn test_create_customer_starts_owned_with_initial_intent() {
        let t = ledger().await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;

        let customer = t
            .ledger
            .create_customer(&scope_of(&alice), NewCustomer::new("Bob", "555-0100"))
            .await
            .unwrap();

        assert_eq!(customer.loan_intent, 10);
        assert!(!customer.is_in_public_sea);
        assert_eq!(customer.saler_id, Some(alice.id));
        assert_eq!(customer.department_id, Some(t.alpha.id));
        assert_eq!(customer.zone_id, Some(t.north.id));
    }

    #[tokio::test]
    async fn test_only_sales_roles_create_customers() {
        let t = ledger().await;
        let accountant = seed_user(&t.store, "acc", Role::Accountant, None).await;
        let err = t
            .ledger
            .create_customer(&scope_of(&accountant), NewCustomer::new("Bob", "555-0100"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_create_customer_requires_name_and_phone() {
        let t = ledger().await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let err = t
            .ledger
            .create_customer(&scope_of(&alice), NewCustomer::new("", "555-0100"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_manager_migrates_only_within_department() {
        let t = ledger().await;
        let maria = seed_user(&t.store, "maria", Role::SalesManager, Some(&t.alpha)).await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let anna = seed_user(&t.store, "anna", Role::SalesRepresentative, Some(&t.alpha)).await;
        let bruno = seed_user(&t.store, "bruno", Role::SalesRepresentative, Some(&t.beta)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;

        let err = t
            .ledger
            .migrate_customer(&scope_of(&maria), lead.id, Some(bruno.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let moved = t
            .ledger
            .migrate_customer(&scope_of(&maria), lead.id, Some(anna.id))
            .await
            .unwrap();
        assert_eq!(moved.saler_id, Some(anna.id));
        assert!(moved.ownership_is_consistent());
    }

    #[tokio::test]
    async fn test_director_migrates_across_departments_of_zone() {
        let t = ledger().await;
        let dan = seed_zone_user(&t.store, "dan", Role::SalesDirector, &t.north).await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let bruno = seed_user(&t.store, "bruno", Role::SalesRepresentative, Some(&t.beta)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;

        let moved = t
            .ledger
            .migrate_customer(&scope_of(&dan), lead.id, Some(bruno.id))
            .await
            .unwrap();
        assert_eq!(moved.department_id, Some(t.beta.id));
    }

    #[tokio::test]
    async fn test_migrate_to_none_releases_and_public_sea_must_be_claimed() {
        let t = ledger().await;
        let gm = seed_user(&t.store, "boss", Role::GeneralManager, None).await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;

        let released = t.ledger.migrate_customer(&scope_of(&gm), lead.id, None).await.unwrap();
        assert!(released.is_in_public_sea);
        assert!(released.ownership_is_consistent());

        let err = t
            .ledger
            .migrate_customer(&scope_of(&gm), lead.id, Some(alice.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_migrate_to_non_sales_user_is_invalid() {
        let t = ledger().await;
        let gm = seed_user(&t.store, "boss", Role::GeneralManager, None).await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let acc = seed_user(&t.store, "acc", Role::Accountant, Some(&t.alpha)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;

        let err = t
            .ledger
            .migrate_customer(&scope_of(&gm), lead.id, Some(acc.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_claim_resets_intent_and_is_idempotent_for_owner() {
        let t = ledger().await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let bruno = seed_user(&t.store, "bruno", Role::SalesRepresentative, Some(&t.beta)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;
        t.store
            .seed(|state| {
                if let Some(c) = state.customers.get_mut(&lead.id) {
                    c.loan_intent = 0;
                    c.release_to_public_sea();
                }
            })
            .await;

        let claimed = t.ledger.claim_customer(&scope_of(&bruno), lead.id).await.unwrap();
        assert_eq!(claimed.saler_id, Some(bruno.id));
        assert_eq!(claimed.department_id, Some(t.beta.id));
        assert_eq!(claimed.loan_intent, INITIAL_LOAN_INTENT);

        let again = t.ledger.claim_customer(&scope_of(&bruno), lead.id).await.unwrap();
        assert_eq!(again, claimed);

        let err = t.ledger.claim_customer(&scope_of(&alice), lead.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_reads_are_scoped() {
        let t = ledger().await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let anna = seed_user(&t.store, "anna", Role::SalesRepresentative, Some(&t.alpha)).await;
        let maria = seed_user(&t.store, "maria", Role::SalesManager, Some(&t.alpha)).await;
        let bruno = seed_user(&t.store, "bruno", Role::SalesRepresentative, Some(&t.beta)).await;
        let bob = seed_customer(&t.store, &alice, "Bob").await;
        seed_customer(&t.store, &anna, "Carl").await;
        seed_customer(&t.store, &bruno, "Dora").await;

        let own = t.ledger.list_customers(&scope_of(&alice), PageRequest::default()).await.unwrap();
        assert_eq!(own.total, 1);
        let department = t
            .ledger
            .list_customers(&scope_of(&maria), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(department.total, 2);

        assert!(t.ledger.get_customer(&scope_of(&maria), bob.id).await.is_ok());
        assert!(matches!(
            t.ledger.get_customer(&scope_of(&bruno), bob.id).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_public_sea_readable_by_every_role() {
        let t = ledger().await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;
        t.store
            .seed(|state| {
                if let Some(c) = state.customers.get_mut(&lead.id) {
                    c.release_to_public_sea();
                }
            })
            .await;

        for (n, role) in Role::ALL.into_iter().enumerate() {
            let reader = seed_user(&t.store, &format!("reader{n}"), role, None).await;
            let sea = t
                .ledger
                .list_public_sea(&scope_of(&reader), PageRequest::default())
                .await
                .unwrap_or_else(|e| panic!("{role} cannot list the public sea: {e}"));
            assert_eq!(sea.items.len(), 1, "{role}");
            assert!(t.ledger.get_customer(&scope_of(&reader), lead.id).await.is_ok(), "{role}");
        }
    }

    #[tokio::test]
    async fn test_claiming_converted_lead_keeps_it_converted() {
        let t = ledger().await;
        let gm = seed_user(&t.store, "boss", Role::GeneralManager, None).await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let bruno = seed_user(&t.store, "bruno", Role::SalesRepresentative, Some(&t.beta)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;
        t.store
            .seed(|state| {
                if let Some(c) = state.customers.get_mut(&lead.id) {
                    c.loan_intent = CONVERTED_LOAN_INTENT;
                }
            })
            .await;

        t.ledger.migrate_customer(&scope_of(&gm), lead.id, None).await.unwrap();
        let claimed = t.ledger.claim_customer(&scope_of(&bruno), lead.id).await.unwrap();
        assert_eq!(claimed.loan_intent, CONVERTED_LOAN_INTENT);

        let scheduler =
            LifecycleScheduler::new(t.store.clone(), std::time::Duration::from_secs(3600));
        for _ in 0..10 {
            scheduler.run_once().await;
        }
        let state = t.store.snapshot().await;
        let after = &state.customers[&lead.id];
        assert_eq!(after.loan_intent, CONVERTED_LOAN_INTENT);
        assert_eq!(after.saler_id, Some(bruno.id));
        assert!(!after.is_in_public_sea);
    }

    #[tokio::test]
    async fn test_update_customer_keeps_ownership() {
        let t = ledger().await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;

        let update = CustomerUpdate {
            phone: Some("555-0199".into()),
            age: Some(41),
            ..CustomerUpdate::default()
        };
        let updated = t.ledger.update_customer(&scope_of(&alice), lead.id, update).await.unwrap();
        assert_eq!(updated.phone.as_str(), "555-0199");
        assert_eq!(updated.saler_id, lead.saler_id);
        assert_eq!(updated.loan_intent, lead.loan_intent);
    }

    #[tokio::test]
    async fn test_failed_store_leaves_lead_untouched() {
        let t = ledger().await;
        let gm = seed_user(&t.store, "boss", Role::GeneralManager, None).await;
        let alice = seed_user(&t.store, "alice", Role::SalesRepresentative, Some(&t.alpha)).await;
        let lead = seed_customer(&t.store, &alice, "Bob").await;

        t.store.set_unavailable(true);
        let err = t.ledger.migrate_customer(&scope_of(&gm), lead.id, None).await.unwrap_err();
        assert!(err.is_retryable());
        t.store.set_unavailable(false);

        let state = t.store.snapshot().await;
        assert_eq!(state.customers[&lead.id], lead);
        assert!(state.system_logs.is_empty());
    }
}
