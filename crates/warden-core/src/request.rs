//! Inbound payloads
//!
//! Missing JSON fields deserialize to empty values so that they surface as
//! validation errors alongside everything else wrong with the payload.

use serde::Deserialize;
use std::fmt;

use crate::validation::{ValidationErrors, is_email, is_numeric, length, require};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 32;
const PHONE_MIN: usize = 10;
const PHONE_MAX: usize = 20;
const ROLE_NAME_MIN: usize = 3;
const ROLE_NAME_MAX: usize = 30;

/// Registration payload
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role_id: i64,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        require(&mut errors, "fullname", &self.fullname);

        length(&mut errors, "username", &self.username, USERNAME_MIN, USERNAME_MAX);

        if require(&mut errors, "email", &self.email) && !is_email(&self.email) {
            errors.add("email", "must be a valid email address");
        }

        if require(&mut errors, "phone", &self.phone) {
            if !is_numeric(&self.phone) {
                errors.add("phone", "must contain digits only");
            } else {
                length(&mut errors, "phone", &self.phone, PHONE_MIN, PHONE_MAX);
            }
        }

        length(&mut errors, "password", &self.password, PASSWORD_MIN, PASSWORD_MAX);

        if self.role_id <= 0 {
            errors.add("role_id", "is required");
        }

        errors.into_result()
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("fullname", &self.fullname)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .field("role_id", &self.role_id)
            .finish()
    }
}

/// Login payload
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Only the upper password bound is checked here. A password shorter
    /// than the registration minimum can never match a stored digest, so it
    /// is rejected as invalid credentials by the login flow instead.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        length(&mut errors, "username", &self.username, USERNAME_MIN, USERNAME_MAX);
        if require(&mut errors, "password", &self.password) {
            length(&mut errors, "password", &self.password, 1, PASSWORD_MAX);
        }

        errors.into_result()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Role creation payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateRoleRequest {
    pub name: String,
    pub desc: String,
}

impl CreateRoleRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        length(&mut errors, "name", &self.name, ROLE_NAME_MIN, ROLE_NAME_MAX);
        errors.into_result()
    }
}
