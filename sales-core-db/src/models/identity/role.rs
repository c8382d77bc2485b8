use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Database model for the role enum.
///
/// The numeric id is the declaration order and is stable; it is the value
/// carried by legacy integrations, while tokens carry the canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "PascalCase")]
pub enum Role {
    GeneralManager,
    SystemAdministrator,
    SalesRepresentative,
    SalesManager,
    SalesDirector,
    Accountant,
    FinanceSpecialist,
    FinanceManager,
    Default,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::GeneralManager,
        Role::SystemAdministrator,
        Role::SalesRepresentative,
        Role::SalesManager,
        Role::SalesDirector,
        Role::Accountant,
        Role::FinanceSpecialist,
        Role::FinanceManager,
        Role::Default,
    ];

    /// Roles that own leads and submit contracts
    pub const SALES: [Role; 3] = [
        Role::SalesRepresentative,
        Role::SalesManager,
        Role::SalesDirector,
    ];

    pub fn id(self) -> i16 {
        match self {
            Role::GeneralManager => 0,
            Role::SystemAdministrator => 1,
            Role::SalesRepresentative => 2,
            Role::SalesManager => 3,
            Role::SalesDirector => 4,
            Role::Accountant => 5,
            Role::FinanceSpecialist => 6,
            Role::FinanceManager => 7,
            Role::Default => 8,
        }
    }

    pub fn from_id(id: i16) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::GeneralManager => "GeneralManager",
            Role::SystemAdministrator => "SystemAdministrator",
            Role::SalesRepresentative => "SalesRepresentative",
            Role::SalesManager => "SalesManager",
            Role::SalesDirector => "SalesDirector",
            Role::Accountant => "Accountant",
            Role::FinanceSpecialist => "FinanceSpecialist",
            Role::FinanceManager => "FinanceManager",
            Role::Default => "Default",
        }
    }

    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.name() == name)
    }

    pub fn is_sales(self) -> bool {
        Role::SALES.contains(&self)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_name(s).ok_or(())
    }
}
