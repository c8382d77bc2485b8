use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::contract::ContractModel;
use crate::models::lead::CustomerModel;

/// Row-level predicate applied by scoped list and aggregate queries.
///
/// Produced by the access scope resolver and evaluated by the store, so a
/// scoped listing never loads rows the caller is not allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnershipFilter {
    /// No restriction
    All,
    /// Rows whose `saler_id` equals the id
    Saler(Uuid),
    /// Rows whose `department_id` equals the id
    Department(Uuid),
    /// Rows whose `zone_id` equals the id
    Zone(Uuid),
    /// Contracts whose `specialist_id` equals the id. Matches no customer.
    Specialist(Uuid),
}

impl OwnershipFilter {
    pub fn matches_customer(&self, customer: &CustomerModel) -> bool {
        match *self {
            OwnershipFilter::All => true,
            OwnershipFilter::Saler(id) => customer.saler_id == Some(id),
            OwnershipFilter::Department(id) => customer.department_id == Some(id),
            OwnershipFilter::Zone(id) => customer.zone_id == Some(id),
            OwnershipFilter::Specialist(_) => false,
        }
    }

    pub fn matches_contract(&self, contract: &ContractModel) -> bool {
        match *self {
            OwnershipFilter::All => true,
            OwnershipFilter::Saler(id) => contract.saler_id == id,
            OwnershipFilter::Department(id) => contract.department_id == Some(id),
            OwnershipFilter::Zone(id) => contract.zone_id == Some(id),
            OwnershipFilter::Specialist(id) => contract.specialist_id == id,
        }
    }
}

/// Half-open time window `[start, end)` over `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Raw sum and count of contract amounts, as returned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmountAggregate {
    pub total: Decimal,
    pub count: i64,
}
