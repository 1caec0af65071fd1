//! Role gate for admin-only routes.
//!
//! The gate is a pure function of the auth snapshot and the current location.
//! It holds no state and is evaluated on every render. UX-only: real access
//! control must live on the API.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::activation::gateway::{NavigationState, Navigator};
use crate::activation::types::AuthUser;

/// What the session context reports at a given moment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub user: Option<AuthUser>,
    pub loading: bool,
}

impl AuthSnapshot {
    #[must_use]
    pub fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_in(user: AuthUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }
}

/// Read capability over the shared session context.
pub trait AuthContext: Send + Sync {
    fn read(&self) -> AuthSnapshot;
}

impl AuthContext for AuthSnapshot {
    fn read(&self) -> AuthSnapshot {
        self.clone()
    }
}

#[derive(Clone, Debug)]
pub struct GatePolicy {
    /// Identifier that is always privileged, whatever its role.
    pub reserved_admin_identifier: String,
    pub admin_role: String,
    pub login_path: String,
    pub landing_path: String,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            reserved_admin_identifier: "admin".to_string(),
            admin_role: "admin".to_string(),
            login_path: "/login".to_string(),
            landing_path: "/".to_string(),
        }
    }
}

impl GatePolicy {
    #[must_use]
    pub fn is_privileged(&self, user: &AuthUser) -> bool {
        user.identifier == self.reserved_admin_identifier || user.role == self.admin_role
    }
}

/// Why a redirect was chosen. Never shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated,
    NotPrivileged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Session still loading; render a placeholder and decide later.
    Placeholder,
    Render,
    Redirect {
        to: String,
        state: NavigationState,
        reason: Denial,
    },
}

/// Decides what the protected route at `location` should do.
#[must_use]
pub fn evaluate(snapshot: &AuthSnapshot, location: &str, policy: &GatePolicy) -> GateDecision {
    if snapshot.loading {
        return GateDecision::Placeholder;
    }

    let Some(user) = &snapshot.user else {
        return GateDecision::Redirect {
            to: policy.login_path.clone(),
            state: NavigationState::from_location(location),
            reason: Denial::Unauthenticated,
        };
    };

    if policy.is_privileged(user) {
        GateDecision::Render
    } else {
        GateDecision::Redirect {
            to: policy.landing_path.clone(),
            state: NavigationState::default(),
            reason: Denial::NotPrivileged,
        }
    }
}

/// Gate bound to a session context and a navigator.
pub struct RoleGate {
    auth: Arc<dyn AuthContext>,
    navigator: Arc<dyn Navigator>,
    policy: GatePolicy,
}

impl RoleGate {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthContext>,
        navigator: Arc<dyn Navigator>,
        policy: GatePolicy,
    ) -> Self {
        Self {
            auth,
            navigator,
            policy,
        }
    }

    #[must_use]
    pub fn decide(&self, location: &str) -> GateDecision {
        evaluate(&self.auth.read(), location, &self.policy)
    }

    /// Renders `content` when allowed. Returns `None` for the placeholder and
    /// after issuing a redirect.
    pub fn guard<T>(&self, location: &str, content: impl FnOnce() -> T) -> Option<T> {
        match self.decide(location) {
            GateDecision::Render => Some(content()),
            GateDecision::Placeholder => None,
            GateDecision::Redirect { to, state, reason } => {
                debug!(?reason, to = %to, "role gate redirect");
                self.navigator.navigate(&to, state);
                None
            }
        }
    }
}
