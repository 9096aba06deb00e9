use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::core::state::AppState;
use crate::schemas::auth::Credentials;
use crate::store::{
    collections::{ADMINS, TUTORS},
    Filter, StoreError,
};

/// The three sign-in tiers. Master admins and tutor-admins share one account
/// collection; tutors have their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    MasterAdmin,
    TutorAdmin,
    Tutor,
}

impl Role {
    pub fn collection(self) -> &'static str {
        match self {
            Self::MasterAdmin | Self::TutorAdmin => ADMINS,
            Self::Tutor => TUTORS,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MasterAdmin => "master admin",
            Self::TutorAdmin => "tutor admin",
            Self::Tutor => "tutor",
        })
    }
}

/// The signed-in user, as kept in application state and the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid login payload: {0}")]
    Invalid(String),
    #[error("no {0} account found with that email")]
    UnknownEmail(Role),
    #[error("invalid credentials or the account is not approved yet")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where the serialized session lives between application starts. The hosting
/// shell decides the actual medium (browser session storage in the source).
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, serialized: &str);
    fn clear(&self);
}

/// Session kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(|err| err.into_inner()).clone()
    }

    fn save(&self, serialized: &str) {
        *self.value.lock().unwrap_or_else(|err| err.into_inner()) = Some(serialized.to_string());
    }

    fn clear(&self) {
        *self.value.lock().unwrap_or_else(|err| err.into_inner()) = None;
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRecord {
    email: String,
    password: String,
    #[serde(default)]
    is_approved: bool,
}

/// Application auth state: `{ user, login, logout, is_loading }`, populated
/// from the persisted session at start and cleared on logout.
pub struct AuthService {
    session: Arc<dyn SessionStore>,
    user: Option<AuthUser>,
    is_loading: bool,
}

impl AuthService {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session, user: None, is_loading: true }
    }

    /// Rehydrate the signed-in user from the persisted session. A corrupted
    /// session entry is dropped rather than propagated.
    pub fn restore(&mut self) {
        if let Some(raw) = self.session.load() {
            match serde_json::from_str::<AuthUser>(&raw) {
                Ok(user) => self.user = Some(user),
                Err(err) => {
                    tracing::warn!(error = %err, "Stored session is unreadable; clearing it");
                    self.session.clear();
                }
            }
        }
        self.is_loading = false;
    }

    /// Look the account up by email and compare the stored password field.
    /// The backing documents keep passwords in plaintext; verifying them is
    /// the document backend's contract, not a cryptographic check.
    pub async fn login(
        &mut self,
        state: &AppState,
        role: Role,
        credentials: &Credentials,
    ) -> Result<AuthUser, AuthError> {
        credentials.validate().map_err(|err| AuthError::Invalid(err.to_string()))?;

        let documents = state
            .store()
            .query(
                role.collection(),
                &[Filter::eq("email", credentials.email.clone())],
                None,
            )
            .await?;

        let Some(document) = documents.first() else {
            return Err(AuthError::UnknownEmail(role));
        };
        let record: LoginRecord = document.decode()?;

        if record.password != credentials.password || !record.is_approved {
            tracing::debug!(role = %role, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = AuthUser { email: record.email, role };
        match serde_json::to_string(&user) {
            Ok(raw) => self.session.save(&raw),
            Err(err) => tracing::warn!(error = %err, "Failed to persist session"),
        }
        tracing::info!(role = %role, "Login succeeded");
        self.user = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.session.clear();
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}
