//! Authentication Models
//! Mission: Define user accounts, token claims and the auth request bodies

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PHONE_LEN: usize = 10;
pub const MIN_PASSWORD_LEN: usize = 8;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing, default)]
    pub password: String, // bcrypt hash - never serialize
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

/// Fields required to insert a user. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub id: String, // user id (hyphenated UUID)
    pub name: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Register request body. Fields are optional so missing ones surface as validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A register request that passed validation. The password is still plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, String> {
        let name = validate_name(required("name", self.name)?)?;
        let email = validate_email(required("email", self.email)?)?;
        let phone = self.phone.map(validate_phone).transpose()?;
        let password = validate_password(required("password", self.password)?)?;

        Ok(Registration {
            name,
            email,
            phone,
            password,
        })
    }
}

/// Login request body
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(email, password)` with the email normalized the way it is stored.
    pub fn validate(self) -> Result<(String, String), String> {
        let email = required("email", self.email)?;
        let password = required("password", self.password)?;
        Ok((normalize_email(&email), password))
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Update request for `PUT /user/:id`. Present fields follow the registration rules.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Validated update; the password, if any, is still plaintext.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UserUpdate, String> {
        Ok(UserUpdate {
            name: self.name.map(validate_name).transpose()?,
            email: self.email.map(validate_email).transpose()?,
            phone: self.phone.map(validate_phone).transpose()?,
            password: self.password.map(validate_password).transpose()?,
        })
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural email check: one `@`, a non-empty local part, and a dotted domain
/// whose labels are non-empty alphanumerics or hyphens.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    labels_ok && tld_ok
}

fn required(field: &str, value: Option<String>) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(format!("\"{}\" is not allowed to be empty", field)),
        None => Err(format!("\"{}\" is required", field)),
    }
}

fn min_length(field: &str, value: &str, min: usize) -> Result<(), String> {
    if value.chars().count() < min {
        return Err(format!(
            "\"{}\" length must be at least {} characters long",
            field, min
        ));
    }
    Ok(())
}

fn validate_name(name: String) -> Result<String, String> {
    let name = name.trim().to_string();
    min_length("name", &name, MIN_NAME_LEN)?;
    Ok(name)
}

fn validate_email(email: String) -> Result<String, String> {
    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        return Err("\"email\" must be a valid email".to_string());
    }
    Ok(email)
}

fn validate_phone(phone: String) -> Result<String, String> {
    min_length("phone", &phone, MIN_PHONE_LEN)?;
    Ok(phone)
}

fn validate_password(password: String) -> Result<String, String> {
    min_length("password", &password, MIN_PASSWORD_LEN)?;
    Ok(password)
}
