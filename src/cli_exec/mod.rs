use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use redfreelance::api::ApiClient;
use redfreelance::clock::SystemClock;
use redfreelance::config::ClientConfig;
use redfreelance::notify::{NotificationKind, ShownNotification};
use redfreelance::pages::{Controller, InlineMessage, Navigation, PageContext};
use redfreelance::storage::FileStore;

use crate::{Commands, ConfigCommands, ServicesCommands};

mod catalog;
mod dispatch;
mod session;
mod settings;

pub(super) fn handle_command(config: ClientConfig, command: Commands) -> Result<()> {
    dispatch::handle_command(config, command)
}

/// What every command works against: the data dir's store and both backends.
pub(super) struct CliEnv {
    pub(super) config: ClientConfig,
    pub(super) store: FileStore,
    pub(super) api: ApiClient,
}

impl CliEnv {
    pub(super) fn open(config: ClientConfig) -> Result<Self> {
        let store = FileStore::open(&config.data_dir)?;
        let api = ApiClient::new(&config)?;
        Ok(Self { config, store, api })
    }

    /// A fresh page load; any notification left by the previous command is shown here.
    pub(super) fn page(&self) -> Result<PageContext<&FileStore, SystemClock>> {
        PageContext::load(&self.store, SystemClock)
    }
}

/// Prints the toasts a page showed. Error toasts are returned instead, the last one
/// as the command's failure.
fn report<'a>(shown: impl Iterator<Item = &'a ShownNotification>) -> Option<String> {
    let mut failure: Option<String> = None;
    for s in shown {
        let n = &s.notification;
        match n.kind {
            NotificationKind::Error => {
                if let Some(prev) = failure.replace(n.message.clone()) {
                    eprintln!("error: {}", prev);
                }
            }
            NotificationKind::Warning => eprintln!("warning: {}", n.message),
            NotificationKind::Success | NotificationKind::Info => println!("{}", n.message),
        }
    }
    failure
}

/// Ends a command: prints what the page showed and follows a redirect to login the
/// way the next page load would. Fails when the page reported an error or sent the
/// user to log in.
pub(super) fn finish(env: &CliEnv, page: &mut impl Controller) -> Result<()> {
    let mut failure = report(page.context().toaster().history());
    if page.context_mut().take_navigation() == Some(Navigation::Login) {
        let login = env.page()?;
        let redirect = report(login.toaster().history());
        failure = failure
            .or(redirect)
            .or_else(|| Some("login required".to_string()));
    }
    match failure {
        Some(msg) => Err(anyhow::anyhow!(msg)),
        None => Ok(()),
    }
}

pub(super) fn inline(message: Option<&InlineMessage>) -> Result<()> {
    match message {
        Some(m) if m.is_error => Err(anyhow::anyhow!(m.text.clone())),
        Some(m) => {
            println!("{}", m.text);
            Ok(())
        }
        None => Ok(()),
    }
}

pub(super) fn print_json<T: serde::Serialize>(value: &T, what: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {}", what))?
    );
    Ok(())
}

/// The terminal rendition of the confirmation dialog. Anything but "y"/"yes" is a no.
pub(super) fn ask_yes_no(title: &str, message: &str) -> Result<bool> {
    print!("{}: {} [y/N] ", title, message);
    io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read confirmation")?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
