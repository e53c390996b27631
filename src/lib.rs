pub mod api;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod logging;
pub mod notify;
pub mod pages;
pub mod session;
pub mod storage;
pub mod token;
pub mod tui;

mod tui_shell;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
