use sales_core_db::models::{ContractModel, CustomerModel, Role, UserModel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position of an authenticated actor in the sales hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub user_id: Uuid,
    pub role: Role,
    pub department_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
}

impl From<&UserModel> for Scope {
    fn from(user: &UserModel) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            department_id: user.department_id,
            zone_id: user.zone_id,
        }
    }
}

/// Ownership attributes of the resource an operation targets.
///
/// Only the fields relevant to the resource kind are set; an unset field
/// never matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceOwner {
    pub saler_id: Option<Uuid>,
    pub specialist_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
}

impl ResourceOwner {
    /// Resources owned by a user: their own record, work logs, leads they will own
    pub fn of_user(user: &UserModel) -> Self {
        Self {
            saler_id: Some(user.id),
            specialist_id: None,
            department_id: user.department_id,
            zone_id: user.zone_id,
        }
    }

    pub fn of_scope(scope: &Scope) -> Self {
        Self {
            saler_id: Some(scope.user_id),
            specialist_id: None,
            department_id: scope.department_id,
            zone_id: scope.zone_id,
        }
    }

    pub fn of_customer(customer: &CustomerModel) -> Self {
        Self {
            saler_id: customer.saler_id,
            specialist_id: None,
            department_id: customer.department_id,
            zone_id: customer.zone_id,
        }
    }

    pub fn of_contract(contract: &ContractModel) -> Self {
        Self {
            saler_id: Some(contract.saler_id),
            specialist_id: Some(contract.specialist_id),
            department_id: contract.department_id,
            zone_id: contract.zone_id,
        }
    }

    pub fn department(department_id: Uuid, zone_id: Option<Uuid>) -> Self {
        Self {
            department_id: Some(department_id),
            zone_id,
            ..Self::default()
        }
    }

    pub fn zone(zone_id: Uuid) -> Self {
        Self {
            zone_id: Some(zone_id),
            ..Self::default()
        }
    }
}
