use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::common_enums::Gender;
use crate::models::identifiable::Identifiable;

/// Loan intent assigned to a freshly created or freshly claimed lead
pub const INITIAL_LOAN_INTENT: i32 = 10;

/// Loan intent of a converted lead. Outside the decay window, so it never decays.
pub const CONVERTED_LOAN_INTENT: i32 = 100;

/// Upper bound (inclusive) of the window in which the scheduler decrements loan intent
pub const DECAY_CEILING: i32 = 10;

/// Database model for a sales lead ("customer")
///
/// A lead is either owned (`saler_id` set, `is_in_public_sea == false`) or in the
/// public sea (`saler_id`, `department_id` and `zone_id` all `None`,
/// `is_in_public_sea == true`). Use [`CustomerModel::assign_to`] and
/// [`CustomerModel::release_to_public_sea`] to move between the two states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerModel {
    pub id: Uuid,
    pub name: HeaplessString<100>,
    pub phone: HeaplessString<32>,
    pub age: Option<i16>,
    pub gender: Option<Gender>,
    pub address: Option<String>,

    /// Starts at [`INITIAL_LOAN_INTENT`], decremented daily while in `(0, DECAY_CEILING]`,
    /// set to [`CONVERTED_LOAN_INTENT`] on contract approval. Never negative.
    pub loan_intent: i32,

    pub is_in_public_sea: bool,

    /// References UserModel.id of the owning salesperson
    pub saler_id: Option<Uuid>,
    /// Department of the owning salesperson
    pub department_id: Option<Uuid>,
    /// Zone of the owning salesperson
    pub zone_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerModel {
    pub fn new(
        name: HeaplessString<100>,
        phone: HeaplessString<32>,
        saler_id: Uuid,
        department_id: Option<Uuid>,
        zone_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            age: None,
            gender: None,
            address: None,
            loan_intent: INITIAL_LOAN_INTENT,
            is_in_public_sea: false,
            saler_id: Some(saler_id),
            department_id,
            zone_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Hand the lead to `saler_id`, copying the saler's placement.
    pub fn assign_to(
        &mut self,
        saler_id: Uuid,
        department_id: Option<Uuid>,
        zone_id: Option<Uuid>,
    ) {
        self.saler_id = Some(saler_id);
        self.department_id = department_id;
        self.zone_id = zone_id;
        self.is_in_public_sea = false;
        self.updated_at = Utc::now();
    }

    pub fn release_to_public_sea(&mut self) {
        self.saler_id = None;
        self.department_id = None;
        self.zone_id = None;
        self.is_in_public_sea = true;
        self.updated_at = Utc::now();
    }

    /// Whether the next decay step will decrement this lead
    pub fn is_decaying(&self) -> bool {
        self.loan_intent > 0 && self.loan_intent <= DECAY_CEILING
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.saler_id == Some(user_id)
    }

    /// `is_in_public_sea` holds exactly when no saler is set, and a public-sea
    /// lead carries no placement.
    pub fn ownership_is_consistent(&self) -> bool {
        if self.is_in_public_sea {
            self.saler_id.is_none() && self.department_id.is_none() && self.zone_id.is_none()
        } else {
            self.saler_id.is_some()
        }
    }
}

impl Identifiable for CustomerModel {
    const ENTITY_NAME: &'static str = "Customer";

    fn get_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> CustomerModel {
        CustomerModel::new(
            HeaplessString::try_from("Bob").unwrap(),
            HeaplessString::try_from("555-0100").unwrap(),
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
            Some(Uuid::new_v4()),
        )
    }

    #[test]
    fn test_new_lead_is_owned_with_initial_intent() {
        let customer = lead();
        assert_eq!(customer.loan_intent, INITIAL_LOAN_INTENT);
        assert!(!customer.is_in_public_sea);
        assert!(customer.ownership_is_consistent());
        assert!(customer.is_decaying());
    }

    #[test]
    fn test_release_and_reassign_keep_ownership_consistent() {
        let mut customer = lead();
        customer.release_to_public_sea();
        assert!(customer.is_in_public_sea);
        assert!(customer.saler_id.is_none());
        assert!(customer.ownership_is_consistent());

        let saler = Uuid::new_v4();
        customer.assign_to(saler, None, None);
        assert!(customer.is_owned_by(saler));
        assert!(!customer.is_in_public_sea);
        assert!(customer.ownership_is_consistent());
    }

    #[test]
    fn test_decay_window_bounds() {
        let mut customer = lead();
        customer.loan_intent = 0;
        assert!(!customer.is_decaying());
        customer.loan_intent = 1;
        assert!(customer.is_decaying());
        customer.loan_intent = CONVERTED_LOAN_INTENT;
        assert!(!customer.is_decaying());
    }
}
