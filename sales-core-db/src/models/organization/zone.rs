use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Database model for a sales zone, the top level of the sales hierarchy.
///
/// Departments reference their zone through `DepartmentModel::zone_id`; the zone
/// does not store the reverse list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneModel {
    pub id: Uuid,

    /// Unique across all zones
    pub name: HeaplessString<50>,

    /// References UserModel.id of the sales director leading this zone.
    /// The director's own `zone_id` always equals this zone's id.
    pub director_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

impl ZoneModel {
    pub fn new(name: HeaplessString<50>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            director_id: None,
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for ZoneModel {
    const ENTITY_NAME: &'static str = "Zone";

    fn get_id(&self) -> Uuid {
        self.id
    }
}
