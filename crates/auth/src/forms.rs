//! Request bodies for the public auth endpoints and the checks run on them
//! before anything is sent.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use fleetdesk_core::{DomainError, DomainResult};

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("invalid email regex: {e}"))
});

const MIN_PASSWORD_LEN: usize = 6;
const MIN_PHONE_LEN: usize = 10;

/// Opening wallet balance given to self-registered accounts.
pub const DEFAULT_SIGNUP_AMOUNT: f64 = 5000.0;

pub fn validate_email(email: &str) -> DomainResult<()> {
    if EMAIL_SHAPE.is_match(email) {
        Ok(())
    } else {
        Err(DomainError::validation("Please enter a valid email address"))
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_email(&self.email)
    }
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub amount: f64,
}

/// Sign-up form, including the confirmation field that never leaves the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Please enter your name"));
        }
        validate_email(&self.email)?;
        if self.phone_number.trim().len() < MIN_PHONE_LEN {
            return Err(DomainError::validation("Please enter a valid phone number"));
        }
        if self.password.trim().len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "Password must be at least 6 characters",
            ));
        }
        if self.password != self.confirm_password {
            return Err(DomainError::validation("Passwords do not match"));
        }
        Ok(())
    }

    pub fn into_request(self) -> DomainResult<RegisterRequest> {
        self.validate()?;
        Ok(RegisterRequest {
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            password: self.password,
            amount: DEFAULT_SIGNUP_AMOUNT,
        })
    }

    pub fn login_request(&self) -> LoginRequest {
        LoginRequest::new(self.email.clone(), self.password.clone())
    }
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ForgotPasswordRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.email.trim().is_empty() {
            return Err(DomainError::validation("Please enter your email"));
        }
        Ok(())
    }
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Reset form; `token` comes from the emailed reset link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub token: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn into_request(self) -> DomainResult<ResetPasswordRequest> {
        if self.new_password.trim().len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "New password must be at least 6 characters",
            ));
        }
        if self.new_password != self.confirm_password {
            return Err(DomainError::validation("Passwords do not match"));
        }
        match self.token.filter(|t| !t.trim().is_empty()) {
            Some(token) => Ok(ResetPasswordRequest {
                token,
                new_password: self.new_password,
            }),
            None => Err(DomainError::validation("Invalid or missing token")),
        }
    }
}
