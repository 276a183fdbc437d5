//! Session State
//!
//! Demo authentication: a login flag, the signed-in user, and the active persona.
//! The capability set is cached next to the persona and recomputed on every
//! persona change.

use crate::auth::capability::{Capability, CapabilitySet, Persona, capabilities_of};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Authenticated,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Login form input
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-blank. The password is not checked further.
    pub fn validate(&self) -> Result<AuthUser> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::Validation {
                field: "email",
                message: "Email is required".to_string(),
            });
        }
        if self.password.trim().is_empty() {
            return Err(Error::Validation {
                field: "password",
                message: "Password is required".to_string(),
            });
        }
        let name = email.split('@').next().filter(|s| !s.is_empty()).map(str::to_string);
        Ok(AuthUser {
            email: email.to_string(),
            name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    status: AuthStatus,
    user: Option<AuthUser>,
    persona: Persona,
    capabilities: CapabilitySet,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Persona::default())
    }
}

impl SessionState {
    pub fn new(persona: Persona) -> Self {
        Self {
            status: AuthStatus::Anonymous,
            user: None,
            persona,
            capabilities: capabilities_of(persona),
        }
    }

    /// Rebuild from persisted fields. A user is only kept for an authenticated session.
    pub fn restore(persona: Persona, status: AuthStatus, user: Option<AuthUser>) -> Self {
        let user = match status {
            AuthStatus::Authenticated => user,
            AuthStatus::Anonymous => None,
        };
        Self {
            status,
            user,
            persona,
            capabilities: capabilities_of(persona),
        }
    }

    // ==================== Getters ====================

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn is_engineer(&self) -> bool {
        self.persona == Persona::Engineer
    }

    // ==================== Setters ====================

    pub fn login(&mut self, user: AuthUser) {
        self.status = AuthStatus::Authenticated;
        self.user = Some(user);
    }

    /// Sign out and fall back to the default persona
    pub fn logout(&mut self) {
        *self = Self::new(Persona::default());
    }

    /// Returns true when the persona actually changed
    pub fn set_persona(&mut self, persona: Persona) -> bool {
        if self.persona == persona {
            return false;
        }
        self.persona = persona;
        self.capabilities = capabilities_of(persona);
        true
    }
}
