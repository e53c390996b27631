use anyhow::Result;

use crate::api::{ApiError, AuthApi, CONNECTION_FAILED_MESSAGE, RegisterRequest};
use crate::clock::Clock;
use crate::storage::KeyValueStore;
use crate::token::Role;

use super::{Controller, InlineMessage, Navigation, PageContext};

#[derive(Clone, Debug)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            role: Role::Client,
        }
    }
}

pub struct RegisterPage<S, C> {
    ctx: PageContext<S, C>,
    pub form: RegisterForm,
    message: Option<InlineMessage>,
}

impl<S: KeyValueStore, C: Clock> RegisterPage<S, C> {
    pub fn load(ctx: PageContext<S, C>) -> Self {
        Self {
            ctx,
            form: RegisterForm::default(),
            message: None,
        }
    }

    pub fn message(&self) -> Option<&InlineMessage> {
        let now = self.ctx.now_ms();
        self.message.as_ref().filter(|m| m.is_visible(now))
    }

    /// Registers the account described by the form. The form is reset only on success.
    pub fn submit(&mut self, api: &impl AuthApi) -> Result<()> {
        let now = self.ctx.now_ms();
        let email = self.form.email.trim().to_string();
        if email.is_empty() || self.form.password.is_empty() {
            self.message = Some(InlineMessage::new(
                "Please fill in both email and password.",
                true,
                now,
            ));
            return Ok(());
        }

        let request = RegisterRequest {
            email: email.clone(),
            password: self.form.password.clone(),
            role: self.form.role.clone(),
        };
        let message = match api.register(&request) {
            Ok(user) => {
                tracing::info!(email = %user.email, role = %user.role, "registered");
                self.form = RegisterForm::default();
                InlineMessage::new(
                    format!(
                        "User {} registered successfully as {}!",
                        user.email, user.role
                    ),
                    false,
                    now,
                )
            }
            Err(err @ ApiError::Transport { .. }) => {
                tracing::warn!(error = %err, "registration request failed");
                InlineMessage::new(CONNECTION_FAILED_MESSAGE, true, now)
            }
            Err(err) => {
                let detail = err
                    .detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.user_message());
                InlineMessage::new(format!("Registration failed: {}", detail), true, now)
            }
        };
        self.message = Some(message);
        Ok(())
    }

    pub fn go_to_login(&mut self) {
        self.ctx.navigate(Navigation::Login);
    }
}

impl<S: KeyValueStore, C: Clock> Controller for RegisterPage<S, C> {
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
#[path = "../tests/pages/register_tests.rs"]
mod tests;
