use sales_core_db::RepositoryError;
use thiserror::Error;

/// Outcome of a rejected core operation.
///
/// Everything but `StoreUnavailable` is final for the given input; a caller
/// seeing `StoreUnavailable` may retry later.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::StoreUnavailable(_))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => ServiceError::NotFound(err.to_string()),
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::Unavailable(msg) | RepositoryError::Query(msg) => {
                ServiceError::StoreUnavailable(msg)
            }
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_repository_errors_map_onto_taxonomy() {
        let id = Uuid::new_v4();
        assert!(matches!(
            ServiceError::from(RepositoryError::not_found("Customer", id)),
            ServiceError::NotFound(msg) if msg.contains(&id.to_string())
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Conflict("zone name".into())),
            ServiceError::Conflict(_)
        ));
        assert!(
            ServiceError::from(RepositoryError::Unavailable("pool closed".into())).is_retryable()
        );
        assert!(ServiceError::from(RepositoryError::Query("syntax".into())).is_retryable());
    }
}
