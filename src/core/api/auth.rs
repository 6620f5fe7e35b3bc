//! Authentication context.
//!
//! The identity provider is external: sign-in happens in a hosted flow and
//! hands back a bearer token. Components that talk to protected endpoints
//! receive an [`AuthContext`] explicitly instead of looking up global state.

use std::sync::RwLock;

/// A signed-in user and the bearer credential issued for them.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub display_name: Option<String>,
    pub token: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            token: token.into(),
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name to show in the UI.
    pub fn display(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.user_id)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("token", &mask_token(&self.token))
            .finish()
    }
}

/// Capability for asking who, if anyone, is signed in.
pub trait AuthContext: Send + Sync {
    fn current_user(&self) -> Option<Identity>;
}

/// Session-scoped auth state, updated when the user signs in or out.
#[derive(Debug, Default)]
pub struct SessionAuth {
    identity: RwLock<Option<Identity>>,
}

impl SessionAuth {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: RwLock::new(Some(identity)),
        }
    }

    pub fn sign_in(&self, identity: Identity) {
        log::info!("Signed in as {}", identity.display());
        *self.identity.write().unwrap_or_else(|e| e.into_inner()) = Some(identity);
    }

    pub fn sign_out(&self) {
        log::info!("Signed out");
        *self.identity.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }
}

impl AuthContext for SessionAuth {
    fn current_user(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Masks a token for logging, keeping only its first and last four characters.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
