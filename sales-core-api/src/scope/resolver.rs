use sales_core_db::models::UserModel;
use sales_core_db::repository::OwnershipFilter;
use tracing::{debug, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::scope::actor_scope::{ResourceOwner, Scope};
use crate::scope::policy::{reach_of, Operation, Reach};

pub fn resolve_scope(actor: &UserModel) -> Scope {
    Scope::from(actor)
}

/// Role gate: the reach the actor's role is granted for `operation`.
///
/// Fails with `Forbidden` when the role is not in the operation's grant list.
pub fn role_gate(scope: &Scope, operation: Operation) -> ServiceResult<Reach> {
    reach_of(scope.role, operation).ok_or_else(|| {
        warn!(user_id = %scope.user_id, role = %scope.role, %operation, "role gate rejected actor");
        ServiceError::Forbidden(format!("{} may not perform {}", scope.role, operation))
    })
}

/// Whether `reach`, held by the actor described by `scope`, covers `owner`
pub fn covers(scope: &Scope, reach: Reach, owner: &ResourceOwner) -> bool {
    match reach {
        Reach::Unrestricted => true,
        Reach::Own => owner.saler_id == Some(scope.user_id),
        Reach::Assigned => owner.specialist_id == Some(scope.user_id),
        Reach::Department => {
            scope.department_id.is_some() && owner.department_id == scope.department_id
        }
        Reach::Zone => scope.zone_id.is_some() && owner.zone_id == scope.zone_id,
    }
}

/// Role gate then scope gate for a single resource
pub fn authorize(scope: &Scope, operation: Operation, owner: &ResourceOwner) -> ServiceResult<()> {
    let reach = role_gate(scope, operation)?;
    if covers(scope, reach, owner) {
        debug!(user_id = %scope.user_id, %operation, ?reach, "access granted");
        Ok(())
    } else {
        warn!(user_id = %scope.user_id, %operation, ?reach, "scope gate rejected actor");
        Err(ServiceError::Forbidden(format!(
            "resource is outside the {reach:?} reach of the actor for {operation}"
        )))
    }
}

/// Role gate then scope gate expressed as a row predicate, for list and
/// aggregate queries
pub fn filter(scope: &Scope, operation: Operation) -> ServiceResult<OwnershipFilter> {
    let reach = role_gate(scope, operation)?;
    let filter = match reach {
        Reach::Unrestricted => OwnershipFilter::All,
        Reach::Own => OwnershipFilter::Saler(scope.user_id),
        Reach::Assigned => OwnershipFilter::Specialist(scope.user_id),
        Reach::Department => scope
            .department_id
            .map(OwnershipFilter::Department)
            .ok_or_else(|| ServiceError::Forbidden("actor is not placed in a department".into()))?,
        Reach::Zone => scope
            .zone_id
            .map(OwnershipFilter::Zone)
            .ok_or_else(|| ServiceError::Forbidden("actor is not placed in a zone".into()))?,
    };
    debug!(user_id = %scope.user_id, %operation, ?filter, "scoped query");
    Ok(filter)
}
