//! Page controllers.
//!
//! A controller is created when its page loads and dropped when the user navigates
//! away; nothing but local storage survives between the two. Each controller owns a
//! `PageContext` (storage, clock, toast slot, session gate) and exposes its user
//! actions as methods that take the API client they need.

use anyhow::Result;

use crate::clock::Clock;
use crate::notify::{Notification, Toaster, enqueue_pending, flush_pending};
use crate::session::SessionGate;
use crate::storage::KeyValueStore;

mod landing;
mod login;
mod register;
mod services;

pub use self::landing::{CategoryCard, LandingPage, LandingState, SampleService};
pub use self::login::{LoginForm, LoginPage, LoginView, Welcome};
pub use self::register::{RegisterForm, RegisterPage};
pub use self::services::{
    CategoryPicker, FormError, ListTarget, Listing, MAX_SUGGESTIONS, ManageState, PendingAction,
    ServiceCard, ServiceForm, ServicesPage, UNAUTHORIZED_LIST_MESSAGE,
};
pub(crate) use self::services::names_match;

/// Lifetime of inline form messages.
pub const INLINE_MESSAGE_MS: i64 = 5000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Login,
    Register,
    Landing,
    Services { category: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineMessage {
    pub text: String,
    pub is_error: bool,
    expires_at: i64,
}

impl InlineMessage {
    pub fn new(text: impl Into<String>, is_error: bool, now_ms: i64) -> Self {
        Self {
            text: text.into(),
            is_error,
            expires_at: now_ms + INLINE_MESSAGE_MS,
        }
    }

    pub fn is_visible(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }
}

pub struct PageContext<S, C> {
    gate: SessionGate<S, C>,
    toaster: Toaster,
    navigation: Option<Navigation>,
}

impl<S: KeyValueStore, C: Clock> PageContext<S, C> {
    /// Page load: builds the context and shows any notification left by the previous page.
    pub fn load(store: S, clock: C) -> Result<Self> {
        let gate = SessionGate::new(store, clock);
        let mut toaster = Toaster::new();
        let now = gate.clock().now_ms();
        flush_pending(gate.store(), &mut toaster, now)?;
        Ok(Self {
            gate,
            toaster,
            navigation: None,
        })
    }

    pub fn gate(&self) -> &SessionGate<S, C> {
        &self.gate
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn now_ms(&self) -> i64 {
        self.gate.clock().now_ms()
    }

    pub fn notify(&mut self, notification: Notification) {
        let now = self.now_ms();
        self.toaster.notify(notification, now);
    }

    pub fn close_toast(&mut self) {
        let now = self.now_ms();
        self.toaster.close(now);
    }

    pub fn tick(&mut self) {
        let now = self.now_ms();
        self.toaster.tick(now);
    }

    pub fn navigate(&mut self, to: Navigation) {
        tracing::debug!(?to, "navigate");
        self.navigation = Some(to);
    }

    /// Navigate and have `notification` shown by the next page; a toast shown here
    /// would be torn down with this page.
    pub fn navigate_with(&mut self, to: Navigation, notification: &Notification) -> Result<()> {
        enqueue_pending(self.gate.store(), notification)?;
        self.navigate(to);
        Ok(())
    }

    pub fn pending_navigation(&self) -> Option<&Navigation> {
        self.navigation.as_ref()
    }

    pub fn take_navigation(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }

    pub fn into_parts(self) -> (S, C) {
        self.gate.into_parts()
    }
}

/// Common access to the context of whichever page is loaded.
pub trait Controller {
    type Store: KeyValueStore;
    type Clock: Clock;

    fn context(&self) -> &PageContext<Self::Store, Self::Clock>;
    fn context_mut(&mut self) -> &mut PageContext<Self::Store, Self::Clock>;
}
