//! Toast notifications and the pending-notification handoff across page loads.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::storage::{KeyValueStore, PENDING_NOTIFICATION_KEY};

pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Length of the leave animation; the toast is fully hidden this long after it starts leaving.
pub const LEAVE_ANIMATION_MS: i64 = 500;

const HISTORY_LIMIT: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    #[serde(other)]
    Info,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
            NotificationKind::Warning => "⚠️",
            NotificationKind::Info => "ℹ️",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

fn default_duration() -> u64 {
    DEFAULT_DURATION_MS
}

/// Stored durations may be any JSON number; they round to whole milliseconds and
/// negative or NaN values become zero.
fn duration_from_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(if raw.is_nan() { 0 } else { raw.round().max(0.0) as u64 })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,

    #[serde(rename = "type", default)]
    pub kind: NotificationKind,

    #[serde(
        rename = "duration",
        default = "default_duration",
        deserialize_with = "duration_from_number"
    )]
    pub duration_ms: u64,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Warning)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Info)
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    Hidden,
    Entering,
    Visible,
    Leaving,
}

#[derive(Clone, Debug)]
struct Toast {
    notification: Notification,
    phase: ToastPhase,
    phase_since: i64,
    dismiss_at: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct ShownNotification {
    pub at_ms: i64,
    pub notification: Notification,
}

/// The single toast slot of a page.
///
/// At most one toast is on screen; a new `notify` replaces whatever is showing and
/// drops its auto-dismiss deadline. Phases only advance on `tick`.
#[derive(Debug, Default)]
pub struct Toaster {
    current: Option<Toast>,
    history: VecDeque<ShownNotification>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notification: Notification, now_ms: i64) {
        tracing::debug!(
            kind = notification.kind.label(),
            message = %notification.message,
            "notify"
        );
        let duration = i64::try_from(notification.duration_ms).unwrap_or(i64::MAX);
        let dismiss_at = now_ms.saturating_add(duration);
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(ShownNotification {
            at_ms: now_ms,
            notification: notification.clone(),
        });
        self.current = Some(Toast {
            notification,
            phase: ToastPhase::Entering,
            phase_since: now_ms,
            dismiss_at: Some(dismiss_at),
        });
    }

    /// Manual close: start leaving now and forget the auto-dismiss deadline.
    pub fn close(&mut self, now_ms: i64) {
        if let Some(t) = self.current.as_mut()
            && t.phase != ToastPhase::Leaving
        {
            t.phase = ToastPhase::Leaving;
            t.phase_since = now_ms;
            t.dismiss_at = None;
        }
    }

    pub fn tick(&mut self, now_ms: i64) {
        loop {
            let Some(t) = self.current.as_mut() else {
                return;
            };
            match t.phase {
                ToastPhase::Hidden => {
                    self.current = None;
                    return;
                }
                ToastPhase::Entering => {
                    t.phase = ToastPhase::Visible;
                    t.phase_since = now_ms;
                }
                ToastPhase::Visible => match t.dismiss_at {
                    Some(at) if now_ms >= at => {
                        t.phase = ToastPhase::Leaving;
                        t.phase_since = at;
                        t.dismiss_at = None;
                    }
                    _ => return,
                },
                ToastPhase::Leaving => {
                    if now_ms >= t.phase_since + LEAVE_ANIMATION_MS {
                        self.current = None;
                    }
                    return;
                }
            }
        }
    }

    pub fn phase(&self) -> ToastPhase {
        self.current
            .as_ref()
            .map(|t| t.phase)
            .unwrap_or(ToastPhase::Hidden)
    }

    /// The toast currently on screen, in any phase but hidden.
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|t| &t.notification)
    }

    pub fn history(&self) -> impl Iterator<Item = &ShownNotification> {
        self.history.iter()
    }
}

/// Persist a notification for the next page load. Last write wins.
pub fn enqueue_pending<S: KeyValueStore + ?Sized>(
    store: &S,
    notification: &Notification,
) -> Result<()> {
    let json = serde_json::to_string(notification).context("serialize pending notification")?;
    store.set_item(PENDING_NOTIFICATION_KEY, &json)?;
    tracing::debug!(message = %notification.message, "pending notification stored");
    Ok(())
}

/// Read and delete the pending notification. The entry is removed even when it
/// cannot be parsed, so a bad entry is never retried.
pub fn take_pending<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<Notification>> {
    let Some(raw) = store.get_item(PENDING_NOTIFICATION_KEY)? else {
        return Ok(None);
    };
    store.remove_item(PENDING_NOTIFICATION_KEY)?;
    match serde_json::from_str::<Notification>(&raw) {
        Ok(n) => Ok(Some(n)),
        Err(err) => {
            tracing::warn!(error = %err, "discarding malformed pending notification");
            Ok(None)
        }
    }
}

/// Page-load hook: show the pending notification, if any.
pub fn flush_pending<S: KeyValueStore + ?Sized>(
    store: &S,
    toaster: &mut Toaster,
    now_ms: i64,
) -> Result<bool> {
    match take_pending(store)? {
        Some(n) => {
            toaster.notify(n, now_ms);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
#[path = "tests/notify_tests.rs"]
mod tests;
