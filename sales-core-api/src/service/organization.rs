use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use sales_core_db::models::{DepartmentModel, UserModel, ZoneModel};
use sales_core_db::repository::{Load, Page, PageRequest, UnitOfWork, UnitOfWorkSession};

use crate::error::{ServiceError, ServiceResult};
use crate::scope::{role_gate, Operation, Scope};
use crate::service::{audit, required_text};

/// Zones, departments and the placement of users within them.
///
/// Every write requires administrative authority and keeps the denormalized
/// zone of users and leads in step with their department.
pub struct OrganizationDirectory<U> {
    store: Arc<U>,
}

impl<U: UnitOfWork> OrganizationDirectory<U> {
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    pub async fn create_zone(&self, actor: &Scope, name: &str) -> ServiceResult<ZoneModel> {
        role_gate(actor, Operation::ManageOrganization)?;
        let zone = ZoneModel::new(required_text("zone name", name)?);

        let session = self.store.begin().await?;
        let zone = first(session.zones().create_batch(vec![zone]).await?)?;
        audit(&session, actor.user_id, format!("created zone {}", zone.name)).await?;
        session.commit().await?;

        info!(zone_id = %zone.id, name = %zone.name, "zone created");
        Ok(zone)
    }

    pub async fn create_department(
        &self,
        actor: &Scope,
        name: &str,
        zone_id: Option<Uuid>,
    ) -> ServiceResult<DepartmentModel> {
        role_gate(actor, Operation::ManageOrganization)?;
        let department = DepartmentModel::new(required_text("department name", name)?, zone_id);

        let session = self.store.begin().await?;
        if let Some(zone_id) = zone_id {
            let _: ZoneModel = session.zones().load(zone_id).await?;
        }
        let department = first(session.departments().create_batch(vec![department]).await?)?;
        audit(&session, actor.user_id, format!("created department {}", department.name)).await?;
        session.commit().await?;

        info!(department_id = %department.id, name = %department.name, "department created");
        Ok(department)
    }

    /// Move a user into a department. The user's zone and the placement of
    /// every lead they own follow the department. Leaving a department drops
    /// its manager role; leaving a zone drops its director role.
    pub async fn place_user_in_department(
        &self,
        actor: &Scope,
        user_id: Uuid,
        department_id: Uuid,
    ) -> ServiceResult<UserModel> {
        role_gate(actor, Operation::ManageOrganization)?;

        let session = self.store.begin().await?;
        let mut user: UserModel = session.users().load(user_id).await?;
        let department: DepartmentModel = session.departments().load(department_id).await?;

        if user.department_id != Some(department.id) {
            session.departments().clear_manager(user.id).await?;
        }
        if user.zone_id != department.zone_id {
            session.zones().clear_director(user.id).await?;
        }
        user.department_id = Some(department.id);
        user.zone_id = department.zone_id;

        let user = first(session.users().update_batch(vec![user]).await?)?;
        let leads = session
            .customers()
            .sync_owner_placement(user.id, user.department_id, user.zone_id)
            .await?;
        audit(
            &session,
            actor.user_id,
            format!("placed user {} in department {}", user.username, department.name),
        )
        .await?;
        session.commit().await?;

        info!(
            user_id = %user.id,
            department_id = %department.id,
            leads,
            "user placed in department"
        );
        Ok(user)
    }

    /// Place a zone-level user (typically a director). A user that belongs
    /// to a department can only be placed in that department's zone.
    pub async fn place_user_in_zone(
        &self,
        actor: &Scope,
        user_id: Uuid,
        zone_id: Uuid,
    ) -> ServiceResult<UserModel> {
        role_gate(actor, Operation::ManageOrganization)?;

        let session = self.store.begin().await?;
        let mut user: UserModel = session.users().load(user_id).await?;
        let zone: ZoneModel = session.zones().load(zone_id).await?;

        if let Some(department_id) = user.department_id {
            let department: DepartmentModel = session.departments().load(department_id).await?;
            if department.zone_id != Some(zone.id) {
                return Err(ServiceError::InvalidState(format!(
                    "user {} belongs to department {} outside zone {}",
                    user.username, department.name, zone.name
                )));
            }
        }
        if user.zone_id != Some(zone.id) {
            session.zones().clear_director(user.id).await?;
        }
        user.zone_id = Some(zone.id);

        let user = first(session.users().update_batch(vec![user]).await?)?;
        session
            .customers()
            .sync_owner_placement(user.id, user.department_id, user.zone_id)
            .await?;
        audit(
            &session,
            actor.user_id,
            format!("placed user {} in zone {}", user.username, zone.name),
        )
        .await?;
        session.commit().await?;

        info!(user_id = %user.id, zone_id = %zone.id, "user placed in zone");
        Ok(user)
    }

    /// Attach a department to a zone, moving its users and their leads along
    pub async fn place_department_in_zone(
        &self,
        actor: &Scope,
        department_id: Uuid,
        zone_id: Uuid,
    ) -> ServiceResult<DepartmentModel> {
        role_gate(actor, Operation::ManageOrganization)?;

        let session = self.store.begin().await?;
        let mut department: DepartmentModel = session.departments().load(department_id).await?;
        let zone: ZoneModel = session.zones().load(zone_id).await?;

        department.zone_id = Some(zone.id);
        let department = first(session.departments().update_batch(vec![department]).await?)?;
        let users = session
            .users()
            .set_zone_for_department(department.id, department.zone_id)
            .await?;
        let leads = session
            .customers()
            .sync_department_zone(department.id, department.zone_id)
            .await?;
        audit(
            &session,
            actor.user_id,
            format!("placed department {} in zone {}", department.name, zone.name),
        )
        .await?;
        session.commit().await?;

        info!(
            department_id = %department.id,
            zone_id = %zone.id,
            users,
            leads,
            "department placed in zone"
        );
        Ok(department)
    }

    pub async fn set_department_manager(
        &self,
        actor: &Scope,
        department_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<DepartmentModel> {
        role_gate(actor, Operation::ManageOrganization)?;

        let session = self.store.begin().await?;
        let mut department: DepartmentModel = session.departments().load(department_id).await?;
        let user: UserModel = session.users().load(user_id).await?;
        if user.department_id != Some(department.id) {
            return Err(ServiceError::InvalidState(format!(
                "user {} is not a member of department {}",
                user.username, department.name
            )));
        }

        department.manager_id = Some(user.id);
        let department = first(session.departments().update_batch(vec![department]).await?)?;
        audit(
            &session,
            actor.user_id,
            format!("set {} as manager of department {}", user.username, department.name),
        )
        .await?;
        session.commit().await?;

        info!(department_id = %department.id, manager_id = %user.id, "department manager set");
        Ok(department)
    }

    pub async fn set_zone_director(
        &self,
        actor: &Scope,
        zone_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<ZoneModel> {
        role_gate(actor, Operation::ManageOrganization)?;

        let session = self.store.begin().await?;
        let mut zone: ZoneModel = session.zones().load(zone_id).await?;
        let user: UserModel = session.users().load(user_id).await?;
        if user.zone_id != Some(zone.id) {
            return Err(ServiceError::InvalidState(format!(
                "user {} is not placed in zone {}",
                user.username, zone.name
            )));
        }

        zone.director_id = Some(user.id);
        let zone = first(session.zones().update_batch(vec![zone]).await?)?;
        audit(
            &session,
            actor.user_id,
            format!("set {} as director of zone {}", user.username, zone.name),
        )
        .await?;
        session.commit().await?;

        info!(zone_id = %zone.id, director_id = %user.id, "zone director set");
        Ok(zone)
    }

    pub async fn delete_zone(&self, actor: &Scope, zone_id: Uuid) -> ServiceResult<()> {
        role_gate(actor, Operation::ManageOrganization)?;

        let session = self.store.begin().await?;
        let zone: ZoneModel = session.zones().load(zone_id).await?;
        if session.departments().count_by_zone(zone.id).await? > 0 {
            return Err(ServiceError::InvalidState(format!(
                "zone {} still has departments",
                zone.name
            )));
        }
        if session.users().count_by_zone(zone.id).await? > 0 {
            return Err(ServiceError::InvalidState(format!("zone {} still has users", zone.name)));
        }
        session.zones().delete_batch(&[zone.id]).await?;
        audit(&session, actor.user_id, format!("deleted zone {}", zone.name)).await?;
        session.commit().await?;

        info!(zone_id = %zone.id, "zone deleted");
        Ok(())
    }

    pub async fn delete_department(&self, actor: &Scope, department_id: Uuid) -> ServiceResult<()> {
        role_gate(actor, Operation::ManageOrganization)?;

        let session = self.store.begin().await?;
        let department: DepartmentModel = session.departments().load(department_id).await?;
        if session.users().count_by_department(department.id).await? > 0 {
            return Err(ServiceError::InvalidState(format!(
                "department {} still has users",
                department.name
            )));
        }
        session.departments().delete_batch(&[department.id]).await?;
        audit(&session, actor.user_id, format!("deleted department {}", department.name)).await?;
        session.commit().await?;

        info!(department_id = %department.id, "department deleted");
        Ok(())
    }

    pub async fn list_zones(
        &self,
        actor: &Scope,
        page: PageRequest,
    ) -> ServiceResult<Page<ZoneModel>> {
        role_gate(actor, Operation::ReadOrganization)?;
        let session = self.store.begin().await?;
        Ok(session.zones().list(page).await?)
    }

    pub async fn list_departments(
        &self,
        actor: &Scope,
        zone_id: Option<Uuid>,
        page: PageRequest,
    ) -> ServiceResult<Page<DepartmentModel>> {
        role_gate(actor, Operation::ReadOrganization)?;
        let session = self.store.begin().await?;
        Ok(session.departments().list(zone_id, page).await?)
    }
}

/// First row of a single-item batch result
pub(crate) fn first<T>(rows: Vec<T>) -> ServiceResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| ServiceError::StoreUnavailable("store returned an empty batch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core_db::models::Role;

    use crate::testing::*;

    struct Org {
        store: Arc<MemoryStore>,
        directory: OrganizationDirectory<MemoryStore>,
        admin: Scope,
    }

    async fn org() -> Org {
        let store = Arc::new(MemoryStore::new());
        let admin = seed_user(&store, "root", Role::SystemAdministrator, None).await;
        Org {
            directory: OrganizationDirectory::new(store.clone()),
            admin: scope_of(&admin),
            store,
        }
    }

    #[tokio::test]
    async fn test_create_zone_and_department() {
        let org = org().await;
        let north = org.directory.create_zone(&org.admin, "North").await.unwrap();
        let alpha = org
            .directory
            .create_department(&org.admin, "Alpha", Some(north.id))
            .await
            .unwrap();

        assert_eq!(alpha.zone_id, Some(north.id));
        let state = org.store.snapshot().await;
        assert_eq!(state.system_logs.len(), 2);
        assert!(state.system_logs.iter().all(|entry| entry.user_id == org.admin.user_id));
    }

    #[tokio::test]
    async fn test_duplicate_zone_name_conflicts() {
        let org = org().await;
        org.directory.create_zone(&org.admin, "North").await.unwrap();
        let err = org.directory.create_zone(&org.admin, "North").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(org.store.snapshot().await.system_logs.len(), 1);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let org = org().await;
        let gm = seed_user(&org.store, "boss", Role::GeneralManager, None).await;
        let err = org.directory.create_zone(&scope_of(&gm), "North").await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_department_in_unknown_zone_is_not_found() {
        let org = org().await;
        let err = org
            .directory
            .create_department(&org.admin, "Alpha", Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_place_department_in_zone_is_idempotent_and_moves_members() {
        let org = org().await;
        let north = seed_zone(&org.store, "North").await;
        let south = seed_zone(&org.store, "South").await;
        let alpha = seed_department(&org.store, "Alpha", Some(&north)).await;
        let alice = seed_user(&org.store, "alice", Role::SalesRepresentative, Some(&alpha)).await;
        let lead = seed_customer(&org.store, &alice, "Bob").await;

        let first_run = org
            .directory
            .place_department_in_zone(&org.admin, alpha.id, south.id)
            .await
            .unwrap();
        let second_run = org
            .directory
            .place_department_in_zone(&org.admin, alpha.id, south.id)
            .await
            .unwrap();

        assert_eq!(first_run, second_run);
        let state = org.store.snapshot().await;
        assert_eq!(state.users[&alice.id].zone_id, Some(south.id));
        assert_eq!(state.customers[&lead.id].zone_id, Some(south.id));
        assert_eq!(state.system_logs.len(), 2);
    }

    #[tokio::test]
    async fn test_place_user_in_department_moves_leads_and_drops_manager_role() {
        let org = org().await;
        let north = seed_zone(&org.store, "North").await;
        let alpha = seed_department(&org.store, "Alpha", Some(&north)).await;
        let beta = seed_department(&org.store, "Beta", None).await;
        let maria = seed_user(&org.store, "maria", Role::SalesManager, Some(&alpha)).await;
        let lead = seed_customer(&org.store, &maria, "Bob").await;
        org.directory
            .set_department_manager(&org.admin, alpha.id, maria.id)
            .await
            .unwrap();

        let moved = org
            .directory
            .place_user_in_department(&org.admin, maria.id, beta.id)
            .await
            .unwrap();

        assert_eq!(moved.department_id, Some(beta.id));
        assert_eq!(moved.zone_id, None);
        let state = org.store.snapshot().await;
        assert_eq!(state.departments[&alpha.id].manager_id, None);
        assert_eq!(state.customers[&lead.id].department_id, Some(beta.id));
        assert_eq!(state.customers[&lead.id].zone_id, None);
    }

    #[tokio::test]
    async fn test_manager_must_belong_to_department() {
        let org = org().await;
        let alpha = seed_department(&org.store, "Alpha", None).await;
        let outsider = seed_user(&org.store, "olga", Role::SalesManager, None).await;
        let err = org
            .directory
            .set_department_manager(&org.admin, alpha.id, outsider.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_director_must_be_placed_in_zone() {
        let org = org().await;
        let north = seed_zone(&org.store, "North").await;
        let dan = seed_user(&org.store, "dan", Role::SalesDirector, None).await;

        assert!(org.directory.set_zone_director(&org.admin, north.id, dan.id).await.is_err());
        org.directory.place_user_in_zone(&org.admin, dan.id, north.id).await.unwrap();
        let zone = org.directory.set_zone_director(&org.admin, north.id, dan.id).await.unwrap();
        assert_eq!(zone.director_id, Some(dan.id));
    }

    #[tokio::test]
    async fn test_place_user_in_foreign_zone_is_invalid() {
        let org = org().await;
        let north = seed_zone(&org.store, "North").await;
        let south = seed_zone(&org.store, "South").await;
        let alpha = seed_department(&org.store, "Alpha", Some(&north)).await;
        let alice = seed_user(&org.store, "alice", Role::SalesRepresentative, Some(&alpha)).await;

        let err = org
            .directory
            .place_user_in_zone(&org.admin, alice.id, south.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_non_empty_zone_and_department_cannot_be_deleted() {
        let org = org().await;
        let north = seed_zone(&org.store, "North").await;
        let alpha = seed_department(&org.store, "Alpha", Some(&north)).await;
        let alice = seed_user(&org.store, "alice", Role::SalesRepresentative, Some(&alpha)).await;

        assert!(matches!(
            org.directory.delete_zone(&org.admin, north.id).await,
            Err(ServiceError::InvalidState(_))
        ));
        assert!(matches!(
            org.directory.delete_department(&org.admin, alpha.id).await,
            Err(ServiceError::InvalidState(_))
        ));

        org.store.seed(|state| state.users.remove(&alice.id)).await;
        org.directory.delete_department(&org.admin, alpha.id).await.unwrap();
        org.directory.delete_zone(&org.admin, north.id).await.unwrap();
        assert!(org.store.snapshot().await.zones.is_empty());
    }

    #[tokio::test]
    async fn test_list_departments_by_zone() {
        let org = org().await;
        let north = seed_zone(&org.store, "North").await;
        seed_department(&org.store, "Beta", Some(&north)).await;
        seed_department(&org.store, "Alpha", Some(&north)).await;
        seed_department(&org.store, "Gamma", None).await;

        let page = org
            .directory
            .list_departments(&org.admin, Some(north.id), PageRequest::default())
            .await
            .unwrap();
        let names: Vec<&str> = page.items.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(page.total, 2);
    }
}
