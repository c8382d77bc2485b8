use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::models::identity::role::Role;

/// Database model for an employee account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Uuid,

    /// Unique login name, 1-20 characters
    pub username: HeaplessString<64>,

    /// Opaque credential produced by the credential service
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: Role,

    /// References DepartmentModel.id
    pub department_id: Option<Uuid>,

    /// Mirrors the zone of `department_id` when a department is set.
    /// Only the organization directory writes this field.
    pub zone_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

impl UserModel {
    pub fn new(username: HeaplessString<64>, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
            department_id: None,
            zone_id: None,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for UserModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserModel")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("department_id", &self.department_id)
            .field("zone_id", &self.zone_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Identifiable for UserModel {
    const ENTITY_NAME: &'static str = "User";

    fn get_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = UserModel::new(
            HeaplessString::try_from("alice").unwrap(),
            "$2b$12$secret".to_string(),
            Role::SalesRepresentative,
        );
        let rendered = format!("{user:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_serialize_skips_password_hash() {
        let user = UserModel::new(
            HeaplessString::try_from("bob").unwrap(),
            "$2b$12$secret".to_string(),
            Role::Default,
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
    }
}
