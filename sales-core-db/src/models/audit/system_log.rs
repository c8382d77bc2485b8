use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Identifiable;

/// Actor id used for entries written by the lifecycle scheduler.
pub const SYSTEM_ACTOR_ID: Uuid = Uuid::nil();

/// # Documentation
/// - One entry per committed mutation, written in the same transaction as the change it describes.
/// - Entries are append-only: never updated, never deleted.
/// - `user_id` is the acting user, or [`SYSTEM_ACTOR_ID`] for scheduler batches and
///   anonymous login failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SystemLogModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

impl SystemLogModel {
    pub fn new(user_id: Uuid, action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            action: action.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_system_entry(&self) -> bool {
        self.user_id == SYSTEM_ACTOR_ID
    }
}

impl Identifiable for SystemLogModel {
    const ENTITY_NAME: &'static str = "SystemLog";

    fn get_id(&self) -> Uuid {
        self.id
    }
}
