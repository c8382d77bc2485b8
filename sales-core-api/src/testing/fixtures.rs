use heapless::String as HeaplessString;

use sales_core_db::models::{CustomerModel, DepartmentModel, Role, UserModel, ZoneModel};

use crate::scope::Scope;
use crate::testing::memory_store::MemoryStore;

pub async fn seed_zone(store: &MemoryStore, name: &str) -> ZoneModel {
    let zone = ZoneModel::new(HeaplessString::try_from(name).unwrap_or_default());
    store
        .seed(|state| state.zones.insert(zone.id, zone.clone()))
        .await;
    zone
}

pub async fn seed_department(
    store: &MemoryStore,
    name: &str,
    zone: Option<&ZoneModel>,
) -> DepartmentModel {
    let department = DepartmentModel::new(
        HeaplessString::try_from(name).unwrap_or_default(),
        zone.map(|z| z.id),
    );
    store
        .seed(|state| state.departments.insert(department.id, department.clone()))
        .await;
    department
}

/// Insert a user placed in `department`, with the zone following the department
pub async fn seed_user(
    store: &MemoryStore,
    username: &str,
    role: Role,
    department: Option<&DepartmentModel>,
) -> UserModel {
    let mut user = UserModel::new(
        HeaplessString::try_from(username).unwrap_or_default(),
        String::new(),
        role,
    );
    user.department_id = department.map(|d| d.id);
    user.zone_id = department.and_then(|d| d.zone_id);
    store
        .seed(|state| state.users.insert(user.id, user.clone()))
        .await;
    user
}

/// Insert a zone-level user without a department
pub async fn seed_zone_user(
    store: &MemoryStore,
    username: &str,
    role: Role,
    zone: &ZoneModel,
) -> UserModel {
    let mut user = seed_user(store, username, role, None).await;
    user.zone_id = Some(zone.id);
    store
        .seed(|state| state.users.insert(user.id, user.clone()))
        .await;
    user
}

pub async fn seed_customer(store: &MemoryStore, owner: &UserModel, name: &str) -> CustomerModel {
    let customer = CustomerModel::new(
        HeaplessString::try_from(name).unwrap_or_default(),
        HeaplessString::try_from("555-0100").unwrap_or_default(),
        owner.id,
        owner.department_id,
        owner.zone_id,
    );
    store
        .seed(|state| state.customers.insert(customer.id, customer.clone()))
        .await;
    customer
}

pub fn scope_of(user: &UserModel) -> Scope {
    Scope::from(user)
}
