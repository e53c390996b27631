use std::collections::HashMap;

use anyhow::Result;

use crate::api::{ApiError, AuthApi, CONNECTION_FAILED_MESSAGE, ProbeTarget};
use crate::clock::Clock;
use crate::storage::KeyValueStore;
use crate::token::Role;

use super::{Controller, InlineMessage, Navigation, PageContext};

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Welcome {
    pub identity: String,
    pub role: Role,
    /// Role-gated probe sections visible to this session.
    pub probes: Vec<ProbeTarget>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginView {
    Form,
    Welcome(Welcome),
}

pub struct LoginPage<S, C> {
    ctx: PageContext<S, C>,
    view: LoginView,
    pub form: LoginForm,
    message: Option<InlineMessage>,
    probe_messages: HashMap<ProbeTarget, InlineMessage>,
}

impl<S: KeyValueStore, C: Clock> LoginPage<S, C> {
    pub fn load(ctx: PageContext<S, C>) -> Result<Self> {
        let mut page = Self {
            ctx,
            view: LoginView::Form,
            form: LoginForm::default(),
            message: None,
            probe_messages: HashMap::new(),
        };
        page.refresh()?;
        Ok(page)
    }

    /// Shows the welcome section for a live session and the login form otherwise.
    pub fn refresh(&mut self) -> Result<()> {
        self.view = match self.ctx.gate().get_session()? {
            Some(session) => {
                let probes = ProbeTarget::ALL
                    .into_iter()
                    .filter(|p| session.allows(p.feature()))
                    .collect();
                LoginView::Welcome(Welcome {
                    identity: session.identity,
                    role: session.role,
                    probes,
                })
            }
            None => {
                self.probe_messages.clear();
                LoginView::Form
            }
        };
        Ok(())
    }

    pub fn view(&self) -> &LoginView {
        &self.view
    }

    pub fn message(&self) -> Option<&InlineMessage> {
        let now = self.ctx.now_ms();
        self.message.as_ref().filter(|m| m.is_visible(now))
    }

    pub fn probe_message(&self, target: ProbeTarget) -> Option<&InlineMessage> {
        let now = self.ctx.now_ms();
        self.probe_messages
            .get(&target)
            .filter(|m| m.is_visible(now))
    }

    pub fn submit(&mut self, api: &impl AuthApi) -> Result<()> {
        self.message = None;
        let email = self.form.email.trim().to_string();
        if email.is_empty() || self.form.password.is_empty() {
            self.set_message("Error: email and password are required.", true);
            return Ok(());
        }

        match api.login(&email, &self.form.password) {
            Ok(resp) => {
                self.ctx.gate().store_token(&resp.access_token)?;
                self.form.password.clear();
                self.refresh()?;
                if self.view == LoginView::Form {
                    self.set_message("Error: the server returned an unusable session token.", true);
                } else {
                    tracing::info!(email = %email, "logged in");
                }
            }
            Err(err) => {
                let text = match &err {
                    ApiError::Transport { .. } => CONNECTION_FAILED_MESSAGE.to_string(),
                    other => other.detail().unwrap_or("Login failed.").to_string(),
                };
                self.set_message(format!("Error: {}", text), true);
            }
        }
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.ctx.gate().logout()?;
        self.refresh()?;
        self.set_message("Session closed successfully.", false);
        Ok(())
    }

    pub fn probe(&mut self, api: &impl AuthApi, target: ProbeTarget) -> Result<()> {
        let now = self.ctx.now_ms();
        let Some(session) = self.ctx.gate().get_session()? else {
            // Refreshing drops the probe messages of the old session.
            self.refresh()?;
            self.probe_messages.insert(
                target,
                InlineMessage::new("Not authenticated. Please log in.", true, now),
            );
            return Ok(());
        };

        let msg = match api.probe(target, &session.token) {
            Ok(data) => InlineMessage::new(format!("Access granted! Data: {}", data), false, now),
            Err(err) => InlineMessage::new(format!("Error: {}", err.user_message()), true, now),
        };
        self.probe_messages.insert(target, msg);
        Ok(())
    }

    pub fn go_to_register(&mut self) {
        self.ctx.navigate(Navigation::Register);
    }

    pub fn go_to_landing(&mut self) {
        self.ctx.navigate(Navigation::Landing);
    }

    pub fn go_to_services(&mut self) {
        self.ctx.navigate(Navigation::Services { category: None });
    }

    fn set_message(&mut self, text: impl Into<String>, is_error: bool) {
        let now = self.ctx.now_ms();
        self.message = Some(InlineMessage::new(text, is_error, now));
    }
}

impl<S: KeyValueStore, C: Clock> Controller for LoginPage<S, C> {
    type Store = S;
    type Clock = C;

    fn context(&self) -> &PageContext<S, C> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut PageContext<S, C> {
        &mut self.ctx
    }
}

#[cfg(test)]
#[path = "../tests/pages/login_tests.rs"]
mod tests;
