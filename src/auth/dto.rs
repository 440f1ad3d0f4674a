use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;
use crate::error::{AppError, FieldError};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 255;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 100;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    /// Trims surrounding whitespace from name and email. Case is preserved.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_owned();
        self.email = self.email.trim().to_owned();
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut details = Vec::new();

        let name_len = self.name.chars().count();
        if name_len == 0 {
            details.push(FieldError::new("name", "Name is required"));
        } else if name_len < NAME_MIN_CHARS {
            details.push(FieldError::new("name", "Name must be at least 2 characters"));
        } else if name_len > NAME_MAX_CHARS {
            details.push(FieldError::new("name", "Name is too long"));
        }

        check_email(&self.email, &mut details);

        let pw_len = self.password.chars().count();
        if pw_len == 0 {
            details.push(FieldError::new("password", "Password is required"));
        } else if pw_len < PASSWORD_MIN_CHARS {
            details.push(FieldError::new("password", "Password must be at least 8 characters"));
        } else if pw_len > PASSWORD_MAX_CHARS {
            details.push(FieldError::new("password", "Password is too long"));
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(details))
        }
    }
}

impl LoginRequest {
    pub fn normalize(mut self) -> Self {
        self.email = self.email.trim().to_owned();
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut details = Vec::new();
        check_email(&self.email, &mut details);
        if self.password.is_empty() {
            details.push(FieldError::new("password", "Password is required"));
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(details))
        }
    }
}

fn check_email(email: &str, details: &mut Vec<FieldError>) {
    if email.is_empty() {
        details.push(FieldError::new("email", "Email is required"));
    } else if email.chars().count() > EMAIL_MAX_CHARS || !is_valid_email(email) {
        details.push(FieldError::new("email", "Invalid email address"));
    }
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn fields(err: AppError) -> Vec<&'static str> {
        match err {
            AppError::Validation(d) => d.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("Ann.Lee+tag@Example.org"));
        assert!(!is_valid_email("ann@x"));
        assert!(!is_valid_email("ann x@x.com"));
        assert!(!is_valid_email("@x.com"));
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(register("Ann", "ann@x.com", "password123").validate().is_ok());
    }

    #[test]
    fn reports_every_bad_field() {
        let err = register("A", "nope", "short").validate().unwrap_err();
        assert_eq!(fields(err), vec!["name", "email", "password"]);
    }

    #[test]
    fn password_length_bounds() {
        assert!(register("Ann", "ann@x.com", &"x".repeat(8)).validate().is_ok());
        assert!(register("Ann", "ann@x.com", &"x".repeat(100)).validate().is_ok());
        assert!(register("Ann", "ann@x.com", &"x".repeat(101)).validate().is_err());
    }

    #[test]
    fn normalize_trims_but_preserves_case() {
        let req = register("  Ann ", "  Ann@X.com ", "password123").normalize();
        assert_eq!(req.name, "Ann");
        assert_eq!(req.email, "Ann@X.com");
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"ann@x.com"}"#).unwrap();
        assert_eq!(fields(req.validate().unwrap_err()), vec!["name", "password"]);
    }

    #[test]
    fn login_requires_password() {
        let req = LoginRequest {
            email: "ann@x.com".into(),
            password: String::new(),
        };
        assert_eq!(fields(req.validate().unwrap_err()), vec!["password"]);
    }

    #[test]
    fn public_user_never_carries_hash() {
        let json = serde_json::to_string(&PublicUser {
            id: 1,
            name: "Ann".into(),
            email: "ann@x.com".into(),
        })
        .unwrap();
        assert!(json.contains("ann@x.com"));
        assert!(!json.contains("password"));
    }
}
