use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::required;

/// A stored user account. `password_hash` never leaves the process:
/// responses use [`UserProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email_address: user.email_address.clone(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email_address: user.email_address,
        }
    }
}

/// Registration payload for `POST /api/users`
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for UserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInput")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A registration that passed validation. The password is still plaintext
/// and must be hashed before it becomes a [`NewUser`].
#[derive(Debug)]
pub struct ValidUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password: SecretString,
}

/// Row to insert; carries the digest, never the plaintext
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password_hash: String,
}

impl UserInput {
    pub fn validate(self) -> Result<ValidUser, Vec<String>> {
        let mut errors = Vec::new();

        let first_name = required(
            self.first_name,
            "First name is required",
            "Please provide a first name",
            &mut errors,
        );
        let last_name = required(
            self.last_name,
            "Last name is required",
            "Please provide a last name",
            &mut errors,
        );

        let email_address = match self.email_address {
            None => {
                errors.push("Email address is required".to_string());
                None
            }
            Some(email) if validate_email_format(&email).is_err() => {
                errors.push("Please provide a valid email address".to_string());
                None
            }
            Some(email) => Some(email),
        };

        let password = match self.password {
            None => {
                errors.push("Password is required".to_string());
                None
            }
            Some(p) if p.is_empty() => {
                errors.push("Please provide a password".to_string());
                None
            }
            Some(p) => Some(SecretString::from(p)),
        };

        match (first_name, last_name, email_address, password) {
            (Some(first_name), Some(last_name), Some(email_address), Some(password))
                if errors.is_empty() =>
            {
                Ok(ValidUser {
                    first_name,
                    last_name,
                    email_address,
                    password,
                })
            }
            _ => Err(errors),
        }
    }
}

impl ValidUser {
    pub fn with_hash(self, password_hash: String) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email_address: self.email_address,
            password_hash,
        }
    }
}

/// Basic shape check: one `@`, non-empty local part, dotted domain, no
/// whitespace or `:`
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    let domain = parts[1];
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    // The address is the Basic auth user-id, which cannot contain a colon
    if email.contains(':') {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}
