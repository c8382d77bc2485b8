use sales_core_db::models::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource-level boundary within which a role may act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reach {
    /// Resources whose saler is the actor
    Own,
    /// Contracts whose specialist is the actor
    Assigned,
    /// Resources placed in the actor's department
    Department,
    /// Resources placed in the actor's zone
    Zone,
    Unrestricted,
}

/// Operations guarded by the access scope resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    ManageOrganization,
    ReadOrganization,
    ManageUsers,
    ReadSystemLog,
    CreateCustomer,
    ReadCustomer,
    UpdateCustomer,
    ReadPublicSea,
    ClaimCustomer,
    MigrateCustomer,
    SubmitContract,
    ReadContract,
    UpdateContractStatus,
    UpdateContractAmount,
    ReportPerformance,
    LoanAnalysis,
    RecordWorkLog,
    ReadWorkLog,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

type Grant = (Role, Reach);

const ADMIN_ONLY: &[Grant] = &[(Role::SystemAdministrator, Reach::Unrestricted)];

const EVERYONE: &[Grant] = &[
    (Role::GeneralManager, Reach::Unrestricted),
    (Role::SystemAdministrator, Reach::Unrestricted),
    (Role::SalesRepresentative, Reach::Unrestricted),
    (Role::SalesManager, Reach::Unrestricted),
    (Role::SalesDirector, Reach::Unrestricted),
    (Role::Accountant, Reach::Unrestricted),
    (Role::FinanceSpecialist, Reach::Unrestricted),
    (Role::FinanceManager, Reach::Unrestricted),
    (Role::Default, Reach::Unrestricted),
];

const SALES_OWN: &[Grant] = &[
    (Role::SalesRepresentative, Reach::Own),
    (Role::SalesManager, Reach::Own),
    (Role::SalesDirector, Reach::Own),
];

const SALES_HIERARCHY: &[Grant] = &[
    (Role::SalesRepresentative, Reach::Own),
    (Role::SalesManager, Reach::Department),
    (Role::SalesDirector, Reach::Zone),
    (Role::GeneralManager, Reach::Unrestricted),
];

const SALES_SCOPED: &[Grant] = &[
    (Role::SalesRepresentative, Reach::Own),
    (Role::SalesManager, Reach::Department),
    (Role::SalesDirector, Reach::Zone),
];

const REPORT_READERS: &[Grant] = &[
    (Role::SalesRepresentative, Reach::Own),
    (Role::SalesManager, Reach::Department),
    (Role::SalesDirector, Reach::Zone),
    (Role::GeneralManager, Reach::Unrestricted),
    (Role::FinanceManager, Reach::Unrestricted),
    (Role::Accountant, Reach::Unrestricted),
];

const CONTRACT_READERS: &[Grant] = &[
    (Role::SalesRepresentative, Reach::Own),
    (Role::SalesManager, Reach::Department),
    (Role::SalesDirector, Reach::Zone),
    (Role::FinanceSpecialist, Reach::Assigned),
    (Role::GeneralManager, Reach::Unrestricted),
    (Role::FinanceManager, Reach::Unrestricted),
    (Role::Accountant, Reach::Unrestricted),
];

/// The authorization table: for each operation, the roles allowed to perform
/// it and the boundary each of them is held to. A role absent from the list is
/// denied before any resource is looked at.
pub fn grants(operation: Operation) -> &'static [Grant] {
    match operation {
        Operation::ManageOrganization | Operation::ManageUsers | Operation::ReadSystemLog => {
            ADMIN_ONLY
        }
        Operation::ReadOrganization => &[
            (Role::SystemAdministrator, Reach::Unrestricted),
            (Role::GeneralManager, Reach::Unrestricted),
            (Role::SalesDirector, Reach::Unrestricted),
            (Role::SalesManager, Reach::Unrestricted),
        ],
        Operation::CreateCustomer | Operation::ClaimCustomer | Operation::RecordWorkLog => {
            SALES_OWN
        }
        Operation::ReadCustomer | Operation::UpdateCustomer | Operation::ReadWorkLog => {
            SALES_HIERARCHY
        }
        Operation::SubmitContract => SALES_SCOPED,
        Operation::ReadPublicSea => EVERYONE,
        Operation::MigrateCustomer => &[
            (Role::SalesManager, Reach::Department),
            (Role::SalesDirector, Reach::Zone),
            (Role::GeneralManager, Reach::Unrestricted),
        ],
        Operation::ReadContract | Operation::LoanAnalysis => CONTRACT_READERS,
        Operation::ReportPerformance => REPORT_READERS,
        Operation::UpdateContractStatus => &[
            (Role::FinanceSpecialist, Reach::Assigned),
            (Role::FinanceManager, Reach::Unrestricted),
        ],
        Operation::UpdateContractAmount => &[(Role::Accountant, Reach::Unrestricted)],
    }
}

/// Reach granted to `role` for `operation`, or `None` if the role is not allowed at all
pub fn reach_of(role: Role, operation: Operation) -> Option<Reach> {
    grants(operation)
        .iter()
        .find(|(granted, _)| *granted == role)
        .map(|(_, reach)| *reach)
}
