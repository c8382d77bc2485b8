use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::common_enums::Gender;
use crate::models::identifiable::Identifiable;

/// Personal details of an employee, keyed by the owning user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileModel {
    pub user_id: Uuid,
    pub name: HeaplessString<50>,
    pub age: Option<i16>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub phone: Option<HeaplessString<32>>,
}

impl Identifiable for UserProfileModel {
    const ENTITY_NAME: &'static str = "UserProfile";

    fn get_id(&self) -> Uuid {
        self.user_id
    }
}
