use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use sales_core_db::models::{
    ContractModel, CustomerModel, DepartmentModel, Identifiable, Role, SystemLogModel, UserModel,
    UserProfileModel, WorkLogModel, ZoneModel, DECAY_CEILING,
};
use sales_core_db::repository::{
    AmountAggregate, ContractRepository, CreateBatch, CustomerRepository, DateRange, DeleteBatch,
    DepartmentRepository, ExistByIds, LoadBatch, OwnershipFilter, Page, PageRequest,
    SystemLogRepository, UnitOfWork, UnitOfWorkSession, UpdateBatch, UserProfileRepository,
    UserRepository, WorkLogRepository, ZoneRepository,
};
use sales_core_db::{RepositoryError, RepositoryResult};

/// Full contents of the in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub zones: BTreeMap<Uuid, ZoneModel>,
    pub departments: BTreeMap<Uuid, DepartmentModel>,
    pub users: BTreeMap<Uuid, UserModel>,
    pub user_profiles: BTreeMap<Uuid, UserProfileModel>,
    pub customers: BTreeMap<Uuid, CustomerModel>,
    pub contracts: BTreeMap<Uuid, ContractModel>,
    pub work_logs: BTreeMap<Uuid, WorkLogModel>,
    /// Insertion order
    pub system_logs: Vec<SystemLogModel>,
}

/// [`UnitOfWork`] over process memory.
///
/// A session holds the store lock from `begin` until it is committed or
/// dropped, and works on a private copy that replaces the shared state on
/// commit. Sessions are therefore fully serialized and a dropped session
/// leaves no trace.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<tokio::sync::Mutex<MemoryState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, `begin`, every repository call and `commit` fail with
    /// `RepositoryError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    /// Write directly to the committed state, bypassing services
    pub async fn seed<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    type Session = MemorySession;

    async fn begin(&self) -> RepositoryResult<MemorySession> {
        check_available(&self.unavailable)?;
        let guard = self.state.clone().lock_owned().await;
        let working = Arc::new(Working {
            state: Mutex::new(guard.clone()),
            unavailable: self.unavailable.clone(),
        });
        Ok(MemorySession {
            committed: guard,
            zones: MemoryTable::new(working.clone()),
            departments: MemoryTable::new(working.clone()),
            users: MemoryTable::new(working.clone()),
            customers: MemoryTable::new(working.clone()),
            contracts: MemoryTable::new(working.clone()),
            working,
        })
    }
}

fn check_available(flag: &AtomicBool) -> RepositoryResult<()> {
    if flag.load(Ordering::SeqCst) {
        Err(RepositoryError::Unavailable("memory store marked unavailable".into()))
    } else {
        Ok(())
    }
}

struct Working {
    state: Mutex<MemoryState>,
    unavailable: Arc<AtomicBool>,
}

impl Working {
    fn open(&self) -> RepositoryResult<MutexGuard<'_, MemoryState>> {
        check_available(&self.unavailable)?;
        Ok(self.state.lock())
    }
}

pub struct MemorySession {
    committed: OwnedMutexGuard<MemoryState>,
    working: Arc<Working>,
    zones: MemoryTable<ZoneModel>,
    departments: MemoryTable<DepartmentModel>,
    users: MemoryTable<UserModel>,
    customers: MemoryTable<CustomerModel>,
    contracts: MemoryTable<ContractModel>,
}

#[async_trait]
impl UnitOfWorkSession for MemorySession {
    fn zones(&self) -> &dyn ZoneRepository {
        &self.zones
    }

    fn departments(&self) -> &dyn DepartmentRepository {
        &self.departments
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn user_profiles(&self) -> &dyn UserProfileRepository {
        &*self.working
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn contracts(&self) -> &dyn ContractRepository {
        &self.contracts
    }

    fn work_logs(&self) -> &dyn WorkLogRepository {
        &*self.working
    }

    fn system_logs(&self) -> &dyn SystemLogRepository {
        &*self.working
    }

    async fn commit(mut self) -> RepositoryResult<()> {
        let working = self.working.open()?.clone();
        *self.committed = working;
        Ok(())
    }

    async fn rollback(self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Entities stored in a keyed table of [`MemoryState`]
trait Tabled: Identifiable + Clone + Send + Sync + 'static {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<Uuid, Self>;

    /// Value of the column carrying a unique constraint, if any
    fn unique_key(&self) -> Option<String> {
        None
    }
}

impl Tabled for ZoneModel {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<Uuid, Self> {
        &mut state.zones
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.name.to_string())
    }
}

impl Tabled for DepartmentModel {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<Uuid, Self> {
        &mut state.departments
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.name.to_string())
    }
}

impl Tabled for UserModel {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<Uuid, Self> {
        &mut state.users
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.username.to_string())
    }
}

impl Tabled for CustomerModel {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<Uuid, Self> {
        &mut state.customers
    }
}

impl Tabled for ContractModel {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<Uuid, Self> {
        &mut state.contracts
    }
}

struct MemoryTable<T> {
    working: Arc<Working>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Tabled> MemoryTable<T> {
    fn new(working: Arc<Working>) -> Self {
        Self {
            working,
            _entity: PhantomData,
        }
    }

    fn ensure_unique(table: &BTreeMap<Uuid, T>, item: &T) -> RepositoryResult<()> {
        let Some(key) = item.unique_key() else {
            return Ok(());
        };
        let taken = table.values().any(|other| {
            other.get_id() != item.get_id() && other.unique_key().as_deref() == Some(key.as_str())
        });
        if taken {
            Err(RepositoryError::Conflict(format!(
                "{} '{}' already exists",
                T::ENTITY_NAME,
                key
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<T: Tabled> LoadBatch<T> for MemoryTable<T> {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<T>>> {
        let mut state = self.working.open()?;
        let table = T::table(&mut state);
        Ok(ids.iter().map(|id| table.get(id).cloned()).collect())
    }
}

#[async_trait]
impl<T: Tabled> CreateBatch<T> for MemoryTable<T> {
    async fn create_batch(&self, items: Vec<T>) -> RepositoryResult<Vec<T>> {
        let mut state = self.working.open()?;
        let table = T::table(&mut state);
        for item in &items {
            if table.contains_key(&item.get_id()) {
                return Err(RepositoryError::Conflict(format!(
                    "{} {} already exists",
                    T::ENTITY_NAME,
                    item.get_id()
                )));
            }
            Self::ensure_unique(table, item)?;
            table.insert(item.get_id(), item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl<T: Tabled> UpdateBatch<T> for MemoryTable<T> {
    async fn update_batch(&self, items: Vec<T>) -> RepositoryResult<Vec<T>> {
        let mut state = self.working.open()?;
        let table = T::table(&mut state);
        for item in &items {
            if !table.contains_key(&item.get_id()) {
                return Err(RepositoryError::not_found(T::ENTITY_NAME, item.get_id()));
            }
            Self::ensure_unique(table, item)?;
            table.insert(item.get_id(), item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl<T: Tabled> DeleteBatch for MemoryTable<T> {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        let mut state = self.working.open()?;
        let table = T::table(&mut state);
        Ok(ids.iter().filter(|id| table.remove(id).is_some()).count())
    }
}

#[async_trait]
impl<T: Tabled> ExistByIds for MemoryTable<T> {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>> {
        let mut state = self.working.open()?;
        let table = T::table(&mut state);
        Ok(ids.iter().map(|id| (*id, table.contains_key(id))).collect())
    }
}

fn sorted_page<T: Clone>(
    rows: impl Iterator<Item = T>,
    mut order: impl FnMut(&T, &T) -> std::cmp::Ordering,
    page: PageRequest,
) -> Page<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by(&mut order);
    Page::slice(rows, page)
}

#[async_trait]
impl ZoneRepository for MemoryTable<ZoneModel> {
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<ZoneModel>> {
        let state = self.working.open()?;
        Ok(state.zones.values().find(|z| z.name.as_str() == name).cloned())
    }

    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<ZoneModel>> {
        let state = self.working.open()?;
        Ok(sorted_page(state.zones.values().cloned(), |a, b| a.name.cmp(&b.name), page))
    }

    async fn clear_director(&self, user_id: Uuid) -> RepositoryResult<u64> {
        let mut state = self.working.open()?;
        let mut touched = 0;
        for zone in state.zones.values_mut().filter(|z| z.director_id == Some(user_id)) {
            zone.director_id = None;
            touched += 1;
        }
        Ok(touched)
    }
}

#[async_trait]
impl DepartmentRepository for MemoryTable<DepartmentModel> {
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<DepartmentModel>> {
        let state = self.working.open()?;
        Ok(state.departments.values().find(|d| d.name.as_str() == name).cloned())
    }

    async fn list(
        &self,
        zone_id: Option<Uuid>,
        page: PageRequest,
    ) -> RepositoryResult<Page<DepartmentModel>> {
        let state = self.working.open()?;
        let rows = state
            .departments
            .values()
            .filter(|d| zone_id.is_none() || d.zone_id == zone_id)
            .cloned();
        Ok(sorted_page(rows, |a, b| a.name.cmp(&b.name), page))
    }

    async fn count_by_zone(&self, zone_id: Uuid) -> RepositoryResult<u64> {
        let state = self.working.open()?;
        Ok(state.departments.values().filter(|d| d.zone_id == Some(zone_id)).count() as u64)
    }

    async fn clear_manager(&self, user_id: Uuid) -> RepositoryResult<u64> {
        let mut state = self.working.open()?;
        let mut touched = 0;
        for department in state.departments.values_mut().filter(|d| d.manager_id == Some(user_id)) {
            department.manager_id = None;
            touched += 1;
        }
        Ok(touched)
    }
}

#[async_trait]
impl UserRepository for MemoryTable<UserModel> {
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<UserModel>> {
        let state = self.working.open()?;
        Ok(state.users.values().find(|u| u.username.as_str() == username).cloned())
    }

    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<UserModel>> {
        let state = self.working.open()?;
        Ok(sorted_page(state.users.values().cloned(), |a, b| a.username.cmp(&b.username), page))
    }

    async fn count_by_role(&self, role: Role) -> RepositoryResult<u64> {
        let state = self.working.open()?;
        Ok(state.users.values().filter(|u| u.role == role).count() as u64)
    }

    async fn count_by_department(&self, department_id: Uuid) -> RepositoryResult<u64> {
        let state = self.working.open()?;
        Ok(state.users.values().filter(|u| u.department_id == Some(department_id)).count() as u64)
    }

    async fn count_by_zone(&self, zone_id: Uuid) -> RepositoryResult<u64> {
        let state = self.working.open()?;
        Ok(state.users.values().filter(|u| u.zone_id == Some(zone_id)).count() as u64)
    }

    async fn set_zone_for_department(
        &self,
        department_id: Uuid,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        let mut state = self.working.open()?;
        let mut touched = 0;
        for user in state.users.values_mut().filter(|u| u.department_id == Some(department_id)) {
            user.zone_id = zone_id;
            touched += 1;
        }
        Ok(touched)
    }
}

fn newest_first(a: &CustomerModel, b: &CustomerModel) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id))
}

#[async_trait]
impl CustomerRepository for MemoryTable<CustomerModel> {
    async fn list(
        &self,
        filter: OwnershipFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<CustomerModel>> {
        let state = self.working.open()?;
        let rows = state
            .customers
            .values()
            .filter(|c| !c.is_in_public_sea && filter.matches_customer(c))
            .cloned();
        Ok(sorted_page(rows, newest_first, page))
    }

    async fn list_public_sea(&self, page: PageRequest) -> RepositoryResult<Page<CustomerModel>> {
        let state = self.working.open()?;
        let rows = state.customers.values().filter(|c| c.is_in_public_sea).cloned();
        Ok(sorted_page(rows, newest_first, page))
    }

    async fn decay_loan_intent(&self) -> RepositoryResult<u64> {
        let mut state = self.working.open()?;
        let now = chrono::Utc::now();
        let mut touched = 0;
        for customer in state
            .customers
            .values_mut()
            .filter(|c| c.loan_intent > 0 && c.loan_intent <= DECAY_CEILING)
        {
            customer.loan_intent -= 1;
            customer.updated_at = now;
            touched += 1;
        }
        Ok(touched)
    }

    async fn migrate_exhausted_to_public_sea(&self) -> RepositoryResult<u64> {
        let mut state = self.working.open()?;
        let mut touched = 0;
        for customer in state
            .customers
            .values_mut()
            .filter(|c| c.loan_intent == 0 && !c.is_in_public_sea)
        {
            customer.release_to_public_sea();
            touched += 1;
        }
        Ok(touched)
    }

    async fn set_loan_intent(&self, customer_id: Uuid, loan_intent: i32) -> RepositoryResult<()> {
        let mut state = self.working.open()?;
        let customer = state
            .customers
            .get_mut(&customer_id)
            .ok_or_else(|| RepositoryError::not_found(CustomerModel::ENTITY_NAME, customer_id))?;
        customer.loan_intent = loan_intent;
        customer.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn sync_owner_placement(
        &self,
        saler_id: Uuid,
        department_id: Option<Uuid>,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        let mut state = self.working.open()?;
        let mut touched = 0;
        for customer in state.customers.values_mut().filter(|c| c.saler_id == Some(saler_id)) {
            customer.department_id = department_id;
            customer.zone_id = zone_id;
            touched += 1;
        }
        Ok(touched)
    }

    async fn sync_department_zone(
        &self,
        department_id: Uuid,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        let mut state = self.working.open()?;
        let mut touched = 0;
        for customer in state
            .customers
            .values_mut()
            .filter(|c| !c.is_in_public_sea && c.department_id == Some(department_id))
        {
            customer.zone_id = zone_id;
            touched += 1;
        }
        Ok(touched)
    }

    async fn release_owned_by(&self, saler_id: Uuid) -> RepositoryResult<u64> {
        let mut state = self.working.open()?;
        let mut touched = 0;
        for customer in state.customers.values_mut().filter(|c| c.saler_id == Some(saler_id)) {
            customer.release_to_public_sea();
            touched += 1;
        }
        Ok(touched)
    }
}

#[async_trait]
impl ContractRepository for MemoryTable<ContractModel> {
    async fn list(
        &self,
        filter: OwnershipFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<ContractModel>> {
        let state = self.working.open()?;
        let rows = state
            .contracts
            .values()
            .filter(|c| filter.matches_contract(c))
            .cloned();
        Ok(sorted_page(
            rows,
            |a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)),
            page,
        ))
    }

    async fn aggregate_amount(
        &self,
        filter: OwnershipFilter,
        period: Option<DateRange>,
    ) -> RepositoryResult<AmountAggregate> {
        let state = self.working.open()?;
        Ok(state
            .contracts
            .values()
            .filter(|c| filter.matches_contract(c))
            .filter(|c| period.map_or(true, |p| p.contains(c.created_at)))
            .fold(AmountAggregate::default(), |acc, c| AmountAggregate {
                total: acc.total + c.amount,
                count: acc.count + 1,
            }))
    }
}

#[async_trait]
impl UserProfileRepository for Working {
    async fn find_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Option<UserProfileModel>> {
        let state = self.open()?;
        Ok(state.user_profiles.get(&user_id).cloned())
    }

    async fn upsert(&self, profile: UserProfileModel) -> RepositoryResult<UserProfileModel> {
        let mut state = self.open()?;
        state.user_profiles.insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<bool> {
        let mut state = self.open()?;
        Ok(state.user_profiles.remove(&user_id).is_some())
    }
}

#[async_trait]
impl WorkLogRepository for Working {
    async fn create(&self, log: WorkLogModel) -> RepositoryResult<WorkLogModel> {
        let mut state = self.open()?;
        state.work_logs.insert(log.id, log.clone());
        Ok(log)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> RepositoryResult<Page<WorkLogModel>> {
        let state = self.open()?;
        let rows = state.work_logs.values().filter(|l| l.user_id == user_id).cloned();
        Ok(sorted_page(
            rows,
            |a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)),
            page,
        ))
    }
}

#[async_trait]
impl SystemLogRepository for Working {
    async fn record(&self, user_id: Uuid, action: &str) -> RepositoryResult<SystemLogModel> {
        let mut state = self.open()?;
        let entry = SystemLogModel::new(user_id, action);
        state.system_logs.push(entry.clone());
        Ok(entry)
    }

    async fn list(&self, page: PageRequest) -> RepositoryResult<Page<SystemLogModel>> {
        let state = self.open()?;
        let rows: Vec<SystemLogModel> = state.system_logs.iter().rev().cloned().collect();
        Ok(Page::slice(rows, page))
    }
}
