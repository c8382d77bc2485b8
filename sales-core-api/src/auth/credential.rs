use crate::error::{ServiceError, ServiceResult};

/// Password hashing collaborator
pub trait CredentialService: Send + Sync {
    fn hash(&self, password: &str) -> ServiceResult<String>;

    fn verify(&self, password: &str, hash: &str) -> ServiceResult<bool>;
}

pub struct BcryptCredentialService {
    cost: u32,
}

impl BcryptCredentialService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptCredentialService {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl CredentialService for BcryptCredentialService {
    fn hash(&self, password: &str) -> ServiceResult<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| ServiceError::Validation(format!("cannot hash password: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> ServiceResult<bool> {
        match bcrypt::verify(password, hash) {
            Ok(matches) => Ok(matches),
            // A malformed stored hash can never match
            Err(bcrypt::BcryptError::InvalidHash(_))
            | Err(bcrypt::BcryptError::InvalidPrefix(_)) => Ok(false),
            Err(e) => Err(ServiceError::Validation(format!("cannot verify password: {e}"))),
        }
    }
}
