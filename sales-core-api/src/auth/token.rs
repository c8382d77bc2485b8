use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sales_core_db::models::UserModel;
use serde::{Deserialize, Serialize};

use crate::config::TokenConfig;
use crate::error::{ServiceError, ServiceResult};

/// Claims carried by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub username: String,
    /// Canonical role name, see `Role::name`
    pub user_role: String,
    /// Expiry as seconds since the epoch
    pub exp: u64,
}

/// Issues and validates bearer tokens.
///
/// The scope resolver only consumes already validated [`TokenClaims`].
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &UserModel) -> ServiceResult<String>;

    /// Check signature and expiry. Any failure is `Forbidden`.
    fn validate(&self, token: &str) -> ServiceResult<TokenClaims>;
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn from_config(config: &TokenConfig) -> ServiceResult<Self> {
        if config.secret.is_empty() {
            return Err(ServiceError::Validation("token secret is not configured".into()));
        }
        Ok(Self::new(
            &config.secret,
            Duration::minutes(config.access_token_minutes),
        ))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &UserModel) -> ServiceResult<String> {
        let exp = (Utc::now() + self.lifetime).timestamp().max(0) as u64;
        let claims = TokenClaims {
            username: user.username.to_string(),
            user_role: user.role.name().to_string(),
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Validation(format!("cannot issue token: {e}")))
    }

    fn validate(&self, token: &str) -> ServiceResult<TokenClaims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| ServiceError::Forbidden(format!("invalid token: {e}")))
    }
}
