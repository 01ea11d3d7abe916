//! Identity gate for calendar access.
//!
//! Authentication is delegated to an external provider; the core only cares
//! whether a user is present. Provider failures surface as a generic
//! message and never touch event state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use crate::error::IdentityError;

/// Observable auth state. The provider may still be resolving the session,
/// in which case `loading` is set and the calendar shows nothing yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub loading: bool,
    pub user: Option<String>,
}

/// External identity provider seam.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign an existing user in. Returns the user id.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, IdentityError>;

    /// Register a new account and sign it in. Returns the user id.
    async fn sign_up(&self, email: &str, password: &str) -> Result<String, IdentityError>;

    /// End the current session.
    async fn sign_out(&self);

    /// Current session state.
    fn auth_state(&self) -> AuthState;
}

/// In-memory identity provider: a credential map plus the current session.
#[derive(Default)]
pub struct MemoryIdentity {
    accounts: Mutex<HashMap<String, String>>,
    current: Mutex<Option<String>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider pre-seeded with one already-signed-in user, for local
    /// sessions and tests.
    pub fn signed_in(email: &str) -> Self {
        let provider = Self::new();
        provider
            .accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), String::new());
        *provider.current.lock().unwrap() = Some(email.to_string());
        provider
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(stored) if stored == password => {
                drop(accounts);
                *self.current.lock().unwrap() = Some(email.to_string());
                info!(user = %email, "signed in");
                Ok(email.to_string())
            }
            _ => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(IdentityError::AccountExists);
        }
        accounts.insert(email.to_string(), password.to_string());
        drop(accounts);
        *self.current.lock().unwrap() = Some(email.to_string());
        info!(user = %email, "account created");
        Ok(email.to_string())
    }

    async fn sign_out(&self) {
        if let Some(user) = self.current.lock().unwrap().take() {
            info!(user = %user, "signed out");
        }
    }

    fn auth_state(&self) -> AuthState {
        AuthState {
            loading: false,
            user: self.current.lock().unwrap().clone(),
        }
    }
}

/// What the calendar surface may do for the current auth state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalendarAccess {
    /// Session still resolving; show nothing yet.
    Loading,
    /// No user; redirect to sign-in.
    SignedOut,
    /// User present; calendar unlocked.
    Granted(String),
}

/// Gates calendar access on a present user. Nothing else about identity
/// reaches the core.
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn calendar_access(&self) -> CalendarAccess {
        let state = self.provider.auth_state();
        if state.loading {
            return CalendarAccess::Loading;
        }
        match state.user {
            Some(user) => CalendarAccess::Granted(user),
            None => CalendarAccess::SignedOut,
        }
    }
}
