use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use sales_core_db::models::{UserModel, WorkLogModel};
use sales_core_db::repository::{Load, Page, PageRequest, UnitOfWork, UnitOfWorkSession};

use crate::error::{ServiceError, ServiceResult};
use crate::scope::{authorize, role_gate, Operation, ResourceOwner, Scope};
use crate::service::audit;

/// One day of activity counters
#[derive(Debug, Clone, Copy, Validate)]
pub struct WorkLogEntry {
    #[validate(range(min = 0))]
    pub calls: i32,
    #[validate(range(min = 0))]
    pub valid_calls: i32,
    #[validate(range(min = 0))]
    pub visits: i32,
    #[validate(range(min = 0))]
    pub contracts: i32,
    pub date: NaiveDate,
}

pub struct WorkLogBook<U> {
    store: Arc<U>,
}

impl<U: UnitOfWork> WorkLogBook<U> {
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    pub async fn record_work_log(
        &self,
        actor: &Scope,
        entry: WorkLogEntry,
    ) -> ServiceResult<WorkLogModel> {
        role_gate(actor, Operation::RecordWorkLog)?;
        entry.validate()?;
        if entry.valid_calls > entry.calls {
            return Err(ServiceError::Validation(
                "valid calls cannot exceed calls".into(),
            ));
        }

        let log = WorkLogModel {
            id: Uuid::new_v4(),
            user_id: actor.user_id,
            calls: entry.calls,
            valid_calls: entry.valid_calls,
            visits: entry.visits,
            contracts: entry.contracts,
            date: entry.date,
            created_at: chrono::Utc::now(),
        };

        let session = self.store.begin().await?;
        let log = session.work_logs().create(log).await?;
        audit(&session, actor.user_id, format!("recorded work log for {}", log.date)).await?;
        session.commit().await?;

        info!(user_id = %actor.user_id, date = %log.date, "work log recorded");
        Ok(log)
    }

    /// Logs of `user_id`, for the user themself or a leader whose reach covers them
    pub async fn list_work_logs(
        &self,
        actor: &Scope,
        user_id: Uuid,
        page: PageRequest,
    ) -> ServiceResult<Page<WorkLogModel>> {
        role_gate(actor, Operation::ReadWorkLog)?;
        let session = self.store.begin().await?;
        let user: UserModel = session.users().load(user_id).await?;
        authorize(actor, Operation::ReadWorkLog, &ResourceOwner::of_user(&user))?;
        Ok(session.work_logs().list_by_user(user.id, page).await?)
    }
}
