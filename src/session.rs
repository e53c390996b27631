//! Session lookup and role gating.

use anyhow::Result;

use crate::clock::Clock;
use crate::notify::{Notification, enqueue_pending};
use crate::storage::{ACCESS_TOKEN_KEY, KeyValueStore};
use crate::token::{Role, decode_token};

pub const NOT_AUTHENTICATED_MESSAGE: &str = "Not authenticated. Please log in.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    pub role: Role,
    pub user_id: Option<String>,
    pub token: String,
}

impl Session {
    pub fn allows(&self, feature: Feature) -> bool {
        feature.allows(&self.role)
    }

    /// Admins manage every record; freelancers only their own.
    pub fn can_manage(&self, owner_id: &str) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Freelancer => self.user_id.as_deref() == Some(owner_id),
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    CreateService,
    MyServicesToggle,
    ClientDashboard,
    FreelancerProfile,
    AdminPanel,
}

impl Feature {
    pub fn allows(self, role: &Role) -> bool {
        match self {
            Feature::CreateService | Feature::MyServicesToggle | Feature::FreelancerProfile => {
                matches!(role, Role::Freelancer | Role::Admin)
            }
            Feature::ClientDashboard => matches!(role, Role::Client | Role::Admin),
            Feature::AdminPanel => matches!(role, Role::Admin),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Absent,
    Invalid,
    Expired,
    Active(Session),
}

pub struct SessionGate<S, C> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> SessionGate<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_parts(self) -> (S, C) {
        (self.store, self.clock)
    }

    /// Reads the stored token; an invalid or expired token is removed from storage.
    pub fn inspect(&self) -> Result<SessionState> {
        let Some(token) = self.store.get_item(ACCESS_TOKEN_KEY)? else {
            return Ok(SessionState::Absent);
        };

        let claims = match decode_token(&token) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(error = %err, "stored token is not decodable; clearing it");
                self.store.remove_item(ACCESS_TOKEN_KEY)?;
                return Ok(SessionState::Invalid);
            }
        };

        if claims.is_expired(self.clock.now_ms()) {
            tracing::info!(sub = %claims.sub, "stored token expired; clearing it");
            self.store.remove_item(ACCESS_TOKEN_KEY)?;
            return Ok(SessionState::Expired);
        }

        Ok(SessionState::Active(Session {
            identity: claims.sub,
            role: claims.role,
            user_id: claims.user_id,
            token,
        }))
    }

    pub fn get_session(&self) -> Result<Option<Session>> {
        match self.inspect()? {
            SessionState::Active(s) => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    /// Like `get_session`, for pages that require a login. When there is no usable
    /// session a pending notification explaining why is stored for the login page,
    /// and the caller is expected to navigate there.
    pub fn guard_page(&self) -> Result<Option<Session>> {
        let pending = match self.inspect()? {
            SessionState::Active(s) => return Ok(Some(s)),
            SessionState::Absent => Notification::error(NOT_AUTHENTICATED_MESSAGE),
            SessionState::Invalid | SessionState::Expired => {
                Notification::warning(SESSION_EXPIRED_MESSAGE)
            }
        };
        enqueue_pending(&self.store, &pending)?;
        Ok(None)
    }

    pub fn store_token(&self, token: &str) -> Result<()> {
        self.store.set_item(ACCESS_TOKEN_KEY, token)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove_item(ACCESS_TOKEN_KEY)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
