use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::repository::{
    contract::ContractRepository,
    identity::{UserProfileRepository, UserRepository},
    lead::CustomerRepository,
    organization::{DepartmentRepository, ZoneRepository},
    system_log::SystemLogRepository,
    work_log::WorkLogRepository,
};

/// Entry point to the persistent store.
///
/// Every operation opens a session, works through the session's repositories
/// and then commits. The store handle is injected into each component rather
/// than reached through global state.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: UnitOfWorkSession;

    async fn begin(&self) -> RepositoryResult<Self::Session>;
}

/// A single transaction over all repositories.
///
/// Writes made through the repositories become visible to other sessions only
/// after [`UnitOfWorkSession::commit`]. A session dropped without commit is
/// rolled back.
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync + Sized {
    fn zones(&self) -> &dyn ZoneRepository;
    fn departments(&self) -> &dyn DepartmentRepository;
    fn users(&self) -> &dyn UserRepository;
    fn user_profiles(&self) -> &dyn UserProfileRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn contracts(&self) -> &dyn ContractRepository;
    fn work_logs(&self) -> &dyn WorkLogRepository;
    fn system_logs(&self) -> &dyn SystemLogRepository;

    async fn commit(self) -> RepositoryResult<()>;

    async fn rollback(self) -> RepositoryResult<()>;
}
