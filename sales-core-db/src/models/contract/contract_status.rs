use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Database model for the contract status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contract_status", rename_all = "PascalCase")]
pub enum ContractStatus {
    New,
    Approving,
    Approved,
    Rejected,
}

impl ContractStatus {
    /// Position in the pipeline. Approved and Rejected share the final rank.
    pub fn rank(self) -> u8 {
        match self {
            ContractStatus::New => 0,
            ContractStatus::Approving => 1,
            ContractStatus::Approved | ContractStatus::Rejected => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ContractStatus::Approved | ContractStatus::Rejected)
    }

    /// Transitions only move forward; the same rank is not a transition.
    pub fn can_transition_to(self, next: ContractStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractStatus::New => write!(f, "New"),
            ContractStatus::Approving => write!(f, "Approving"),
            ContractStatus::Approved => write!(f, "Approved"),
            ContractStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for ContractStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(ContractStatus::New),
            "Approving" => Ok(ContractStatus::Approving),
            "Approved" => Ok(ContractStatus::Approved),
            "Rejected" => Ok(ContractStatus::Rejected),
            _ => Err(()),
        }
    }
}
