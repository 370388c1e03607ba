//! `fleetdesk-auth`: session credential and route access policy.
//!
//! This crate is intentionally decoupled from HTTP. Durable storage sits
//! behind the [`TokenStore`] seam so the client crate can plug in SQLite.

pub mod credential;
pub mod forms;
pub mod guard;
pub mod roles;

pub use credential::{CredentialError, CredentialProvider, MemoryTokenStore, TOKEN_KEY, TokenStore};
pub use forms::{
    DEFAULT_SIGNUP_AMOUNT, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
    ResetPasswordForm, ResetPasswordRequest, SignUpForm, validate_email,
};
pub use guard::{AccessGuard, LOGIN_ROUTE, RouteAccess, RouteDecision, Session, authorize_route};
pub use roles::Role;
