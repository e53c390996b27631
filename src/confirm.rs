//! Yes/no confirmation dialog.
//!
//! The dialog stores the action the caller wants to run and hands it back once the
//! user answers, which is how a handler "suspends" until the answer arrives in a
//! single-threaded event loop. Only one request may be outstanding: a second `open`
//! while one is pending is rejected rather than replacing it.

#[derive(Debug, thiserror::Error)]
#[error("a confirmation is already waiting for an answer")]
pub struct ConfirmBusy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmChoice {
    Yes,
    No,
    /// Clicked outside the dialog / pressed Esc.
    Dismiss,
}

#[derive(Clone, Debug)]
pub struct ConfirmRequest<A> {
    pub title: String,
    pub message: String,
    action: A,
}

impl<A> ConfirmRequest<A> {
    pub fn action(&self) -> &A {
        &self.action
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmed<A> {
    pub action: A,
    pub answer: bool,
}

#[derive(Debug)]
pub struct ConfirmDialog<A> {
    pending: Option<ConfirmRequest<A>>,
}

impl<A> Default for ConfirmDialog<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmDialog<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        action: A,
    ) -> Result<(), ConfirmBusy> {
        if self.pending.is_some() {
            return Err(ConfirmBusy);
        }
        self.pending = Some(ConfirmRequest {
            title: title.into(),
            message: message.into(),
            action,
        });
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request(&self) -> Option<&ConfirmRequest<A>> {
        self.pending.as_ref()
    }

    pub fn resolve(&mut self, choice: ConfirmChoice) -> Option<Confirmed<A>> {
        let req = self.pending.take()?;
        Some(Confirmed {
            action: req.action,
            answer: choice == ConfirmChoice::Yes,
        })
    }
}

#[cfg(test)]
#[path = "tests/confirm_tests.rs"]
mod tests;
