//! Signed-in session: tokens in a key-value store, current user in an [`Observable`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use corral_states::{Observable, Subscription};
use log::{error, info, warn};

use crate::BusinessConfig;
use crate::models::{AuthResponse, User};

pub const CURRENT_USER_KEY: &str = "current_user";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("token store error: {0}")]
pub struct TokenStoreError(pub String);

/// Key-value persistence for session data.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError>;
    fn remove(&self, key: &str) -> Result<(), TokenStoreError>;
}

/// A [`TokenStore`] that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Authentication status derived from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    SignedOut,
    /// A token is stored. The user may be unknown if the stored profile was unreadable.
    SignedIn { user: Option<User> },
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::SignedIn { user: Some(user) } => Some(&user.username),
            _ => None,
        }
    }
}

/// Process-wide session holder. Clones share the same store and user.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    token_key: String,
    refresh_token_key: String,
    user: Observable<Option<User>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token_key", &self.token_key)
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Opens the session, restoring the stored user if one is readable.
    pub fn new(store: Arc<dyn TokenStore>, config: &BusinessConfig) -> Self {
        let user = match store.get(CURRENT_USER_KEY) {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    error!("Error parsing user from storage: {e}");
                    None
                }
            },
            None => None,
        };

        Self {
            store,
            token_key: config.token_key.clone(),
            refresh_token_key: config.refresh_token_key.clone(),
            user: Observable::new(user),
        }
    }

    pub fn in_memory(config: &BusinessConfig) -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()), config)
    }

    /// Persists tokens and user from a successful login, then notifies listeners.
    pub fn start(&self, auth: &AuthResponse) -> Result<(), TokenStoreError> {
        let user_json = serde_json::to_string(&auth.user)
            .map_err(|e| TokenStoreError(format!("failed to encode user: {e}")))?;

        self.store.set(&self.token_key, &auth.tokens.access)?;
        self.store
            .set(&self.refresh_token_key, &auth.tokens.refresh)?;
        self.store.set(CURRENT_USER_KEY, &user_json)?;

        info!("Session started for {}", auth.user.username);
        self.user.set(Some(auth.user.clone()));
        Ok(())
    }

    /// Clears every stored key and notifies listeners. Store failures are logged.
    pub fn logout(&self) {
        for key in [
            self.token_key.as_str(),
            self.refresh_token_key.as_str(),
            CURRENT_USER_KEY,
        ] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to clear `{key}` on logout: {e}");
            }
        }
        info!("Session closed");
        self.user.set(None);
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(&self.token_key).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store
            .get(&self.refresh_token_key)
            .filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.get()
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() {
            AuthStatus::SignedIn {
                user: self.current_user(),
            }
        } else {
            AuthStatus::SignedOut
        }
    }

    /// Calls `callback` with the new user on every sign-in and sign-out.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Option<User>) + Send + Sync + 'static,
    {
        self.user.subscribe(callback)
    }
}
