use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use sales_core_api::config::DatabaseConfig;
use sales_core_db::repository::{
    ContractRepository, CustomerRepository, DepartmentRepository, SystemLogRepository, UnitOfWork,
    UnitOfWorkSession, UserProfileRepository, UserRepository, WorkLogRepository, ZoneRepository,
};
use sales_core_db::RepositoryResult;

use crate::executor::Executor;
use crate::repository::{
    ContractRepositoryImpl, CustomerRepositoryImpl, DepartmentRepositoryImpl,
    SystemLogRepositoryImpl, UserProfileRepositoryImpl, UserRepositoryImpl, WorkLogRepositoryImpl,
    ZoneRepositoryImpl,
};

/// [`UnitOfWork`] over a PostgreSQL pool; every session is one transaction.
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    pool: Arc<PgPool>,
}

impl PostgresUnitOfWork {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Open a pool as described by `config`
    pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await?;
        info!(max_connections = config.max_connections, "database pool opened");
        Ok(Self::new(Arc::new(pool)))
    }

    /// Apply the embedded migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&*self.pool).await
    }

    pub fn pool(&self) -> &Arc<PgPool> {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    type Session = PostgresSession;

    async fn begin(&self) -> RepositoryResult<PostgresSession> {
        let tx = self.pool.begin().await?;
        Ok(PostgresSession::new(Executor::new(tx)))
    }
}

/// Every repository bound to one transaction.
///
/// Dropping the session without committing rolls the transaction back.
pub struct PostgresSession {
    executor: Executor,
    zones: ZoneRepositoryImpl,
    departments: DepartmentRepositoryImpl,
    users: UserRepositoryImpl,
    user_profiles: UserProfileRepositoryImpl,
    customers: CustomerRepositoryImpl,
    contracts: ContractRepositoryImpl,
    work_logs: WorkLogRepositoryImpl,
    system_logs: SystemLogRepositoryImpl,
}

impl PostgresSession {
    pub fn new(executor: Executor) -> Self {
        Self {
            zones: ZoneRepositoryImpl::new(executor.clone()),
            departments: DepartmentRepositoryImpl::new(executor.clone()),
            users: UserRepositoryImpl::new(executor.clone()),
            user_profiles: UserProfileRepositoryImpl::new(executor.clone()),
            customers: CustomerRepositoryImpl::new(executor.clone()),
            contracts: ContractRepositoryImpl::new(executor.clone()),
            work_logs: WorkLogRepositoryImpl::new(executor.clone()),
            system_logs: SystemLogRepositoryImpl::new(executor.clone()),
            executor,
        }
    }
}

#[async_trait]
impl UnitOfWorkSession for PostgresSession {
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
        &self.user_profiles
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn contracts(&self) -> &dyn ContractRepository {
        &self.contracts
    }

    fn work_logs(&self) -> &dyn WorkLogRepository {
        &self.work_logs
    }

    fn system_logs(&self) -> &dyn SystemLogRepository {
        &self.system_logs
    }

    async fn commit(self) -> RepositoryResult<()> {
        self.executor.commit().await
    }

    async fn rollback(self) -> RepositoryResult<()> {
        self.executor.rollback().await
    }
}
