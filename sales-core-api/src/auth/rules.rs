use validator::{Validate, ValidationError};

const PASSWORD_PUNCTUATION: &str = r#"!@#$%^&*()_+-=[]{}|\;:'"<>,./?"#;

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(1..=20).contains(&len) {
        return Err(ValidationError::new("username_length"));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || is_cjk(c)) {
        return Err(ValidationError::new("username_charset"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(8..=16).contains(&len) {
        return Err(ValidationError::new("password_length"));
    }
    if !password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_PUNCTUATION.contains(c))
    {
        return Err(ValidationError::new("password_charset"));
    }
    Ok(())
}

/// Username and password as submitted at registration
#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
