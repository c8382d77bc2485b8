use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Database model for a sales department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentModel {
    pub id: Uuid,

    /// Unique across all departments
    pub name: HeaplessString<50>,

    /// References ZoneModel.id. `None` while the department is unassigned.
    pub zone_id: Option<Uuid>,

    /// References UserModel.id of the sales manager.
    /// The manager's `department_id` always equals this department's id.
    pub manager_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

impl DepartmentModel {
    pub fn new(name: HeaplessString<50>, zone_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            zone_id,
            manager_id: None,
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for DepartmentModel {
    const ENTITY_NAME: &'static str = "Department";

    fn get_id(&self) -> Uuid {
        self.id
    }
}
