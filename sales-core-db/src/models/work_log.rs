use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Daily activity counters reported by a salesperson. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WorkLogModel {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Outbound calls placed
    pub calls: i32,
    /// Calls that reached an interested lead
    pub valid_calls: i32,
    /// Face to face meetings
    pub visits: i32,
    /// Contracts signed
    pub contracts: i32,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for WorkLogModel {
    const ENTITY_NAME: &'static str = "WorkLog";

    fn get_id(&self) -> Uuid {
        self.id
    }
}
