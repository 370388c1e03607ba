//! Signed-in profile, the user directory and the public auth flows.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use tokio::sync::RwLock;

use fleetdesk_auth::{
    CredentialProvider, ForgotPasswordRequest, LoginRequest, LoginResponse, ResetPasswordForm,
    Session, SignUpForm,
};
use fleetdesk_core::date;
use fleetdesk_core::{FormData, Upload, UserId};
use fleetdesk_parties::{DocumentKind, ProfileField, User};

use crate::error::{ApiError, ApiResult};
use crate::http::{Access, ApiClient, Body};
use crate::store::{Collection, FetchOutcome, ResourceStore, StoreState};

const USERS: Collection = Collection {
    name: "users",
    path: "/user",
    fetch_failed: "Failed to fetch users",
};

const PROFILE: &str = "/user/profile";
const PROFILE_UPDATE: &str = "/user/profile/update";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
    /// The last profile fetch was rejected; the credential has been dropped.
    pub failed: bool,
}

#[derive(Debug)]
pub struct UserStore {
    api: ApiClient,
    profile: RwLock<ProfileState>,
    users: ResourceStore<User>,
}

fn upload_route(kind: DocumentKind) -> (&'static str, &'static str) {
    match kind {
        DocumentKind::ProfileImage => ("/user/profile/image", "Image upload failed"),
        DocumentKind::IdentityProof => ("/user/profile/aadhar", "Aadhaar upload failed"),
        DocumentKind::LicenceFront => (
            "/user/profile/driving-licence",
            "Driving licence upload failed",
        ),
        DocumentKind::LicenceBack => (
            "/user/profile/driving-licence/back",
            "Driving licence back upload failed",
        ),
    }
}

impl UserStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            users: ResourceStore::new(api.clone(), USERS),
            profile: RwLock::new(ProfileState::default()),
            api,
        }
    }

    fn credentials(&self) -> &Arc<CredentialProvider> {
        self.api.credentials()
    }

    pub async fn profile(&self) -> ProfileState {
        self.profile.read().await.clone()
    }

    /// Input for the route guard.
    pub async fn session(&self) -> Session {
        Session {
            authenticated: self.credentials().is_authenticated(),
            profile_failed: self.profile.read().await.failed,
        }
    }

    // ── Auth ─────────────────────────────────────────────────────────────

    /// Exchange credentials for a token, store it, then load the profile.
    pub async fn login(&self, request: LoginRequest) -> ApiResult<Option<User>> {
        request.validate()?;

        let reply = self
            .api
            .post(
                "/auth/login",
                Access::Public,
                Body::json(&request)?,
                "Login failed",
            )
            .await?;
        let login: LoginResponse = reply.json()?;

        if login.token.is_empty() {
            return Err(ApiError::Parse("login response carried an empty token".into()));
        }

        self.credentials().set(Some(login.token)).await?;
        tracing::info!("signed in");

        self.fetch_profile().await
    }

    /// Create an account, then sign straight into it.
    pub async fn register(&self, form: SignUpForm) -> ApiResult<Option<User>> {
        let login = form.login_request();
        let request = form.into_request()?;

        self.api
            .post(
                "/auth/register",
                Access::Public,
                Body::json(&request)?,
                "Registration failed",
            )
            .await?;
        tracing::info!("account registered");

        self.login(login).await
    }

    /// Ask the server to email a reset link. Returns the server's message.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> ApiResult<Option<String>> {
        request.validate()?;

        let reply = self
            .api
            .post(
                "/auth/forgot-password",
                Access::Public,
                Body::json(&request)?,
                "Something went wrong",
            )
            .await?;
        Ok(reply.message())
    }

    pub async fn reset_password(&self, form: ResetPasswordForm) -> ApiResult<Option<String>> {
        let request = form.into_request()?;

        let reply = self
            .api
            .post(
                "/auth/reset-password",
                Access::Public,
                Body::json(&request)?,
                "Reset failed",
            )
            .await?;
        Ok(reply.message())
    }

    /// Drop the credential (memory and durable copy) and the cached profile.
    pub async fn logout(&self) -> ApiResult<()> {
        *self.profile.write().await = ProfileState::default();
        self.users.clear().await;
        self.credentials().clear().await?;
        tracing::info!("signed out");
        Ok(())
    }

    // ── Profile ──────────────────────────────────────────────────────────

    /// Load the signed-in user's profile.
    ///
    /// Without a credential this does nothing. A rejected fetch means the
    /// token is no good: it is cleared along with the cached profile.
    pub async fn fetch_profile(&self) -> ApiResult<Option<User>> {
        if !self.credentials().is_authenticated() {
            return Ok(None);
        }

        {
            let mut state = self.profile.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = match self.api.get(PROFILE, "Invalid token").await {
            Ok(reply) => reply.json::<User>(),
            Err(err) => Err(err),
        };

        match result {
            Ok(user) => {
                let mut state = self.profile.write().await;
                state.profile = Some(user.clone());
                state.loading = false;
                state.failed = false;
                Ok(Some(user))
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile fetch failed; clearing credential");
                {
                    let mut state = self.profile.write().await;
                    state.profile = None;
                    state.loading = false;
                    state.failed = true;
                    state.error = Some(err.message());
                }
                if let Err(clear_err) = self.credentials().clear().await {
                    tracing::error!(error = %clear_err, "failed to clear rejected credential");
                }
                Err(err)
            }
        }
    }

    /// Replace the photo, identity proof or licence front.
    ///
    /// The licence back also needs a validity date; use
    /// [`UserStore::upload_licence_back`] for it.
    pub async fn upload_document(&self, kind: DocumentKind, file: Upload) -> ApiResult<()> {
        if kind == DocumentKind::LicenceBack {
            return Err(ApiError::Validation(
                "Licence validity date is required".into(),
            ));
        }
        self.put_document(kind, FormData::new().file(kind.field_name(), file))
            .await
    }

    pub async fn upload_licence_back(&self, file: Upload, valid_until: NaiveDate) -> ApiResult<()> {
        let form = FormData::new()
            .file(DocumentKind::LicenceBack.field_name(), file)
            .text("validityDate", date::format_wire_date(valid_until));
        self.put_document(DocumentKind::LicenceBack, form).await
    }

    async fn put_document(&self, kind: DocumentKind, form: FormData) -> ApiResult<()> {
        let (path, failure) = upload_route(kind);
        self.put_profile(path, form, failure).await?;
        tracing::info!(document = kind.field_name(), "profile document uploaded");
        Ok(())
    }

    /// Change one editable field. Returns `false` without sending anything
    /// when the loaded profile already holds `value`.
    pub async fn update_profile_field(&self, field: ProfileField, value: &str) -> ApiResult<bool> {
        let form = field.form(value)?;

        let unchanged = self
            .profile
            .read()
            .await
            .profile
            .as_ref()
            .is_some_and(|user| field.current(user) == value.trim());
        if unchanged {
            return Ok(false);
        }

        let failure = format!("Failed to update {}", field.field_name());
        self.put_profile(PROFILE_UPDATE, form, &failure).await?;
        tracing::info!(field = field.field_name(), "profile field updated");
        Ok(true)
    }

    async fn put_profile(&self, path: &str, form: FormData, failure: &str) -> ApiResult<()> {
        if let Err(err) = self.api.put(path, Body::Form(form), failure).await {
            self.profile.write().await.error = Some(err.message());
            return Err(err);
        }

        // Refresh failures land in the profile state.
        let _ = self.fetch_profile().await;
        Ok(())
    }

    // ── Directory ────────────────────────────────────────────────────────

    pub async fn users(&self) -> StoreState<User> {
        self.users.snapshot().await
    }

    pub async fn fetch_users(&self) -> FetchOutcome {
        self.users.fetch_all().await
    }

    pub async fn delete_user(&self, id: UserId) -> ApiResult<()> {
        self.users
            .write(
                Method::DELETE,
                &format!("{}/{id}", USERS.path),
                Body::Empty,
                "Delete failed",
            )
            .await?;

        self.users.remove_item(id).await;
        tracing::info!(%id, "user deleted");
        Ok(())
    }
}
