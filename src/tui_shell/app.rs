use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::api::{ApiClient, ProbeTarget};
use crate::clock::SystemClock;
use crate::config::ClientConfig;
use crate::notify::{Notification, NotificationKind, ToastPhase};
use crate::pages::{
    Controller, LandingPage, LoginPage, Navigation, PageContext, RegisterPage, ServicesPage,
};
use crate::session::Session;
use crate::storage::FileStore;
use crate::token::Role;

use super::commands::{canonical, command_defs};
use super::input::Input;
use super::modal;
use super::suggest::{score_command, sort_suggestions};
use super::views;

mod dispatch;
mod event_loop;
mod render;
mod runtime;

pub(super) use self::runtime::run;

/// Lines kept in the output panel.
const OUTPUT_LIMIT: usize = 200;

pub(in crate::tui_shell) type Ctx = PageContext<FileStore, SystemClock>;

#[derive(Clone, Copy, Debug)]
pub(in crate::tui_shell) struct CommandDef {
    pub(in crate::tui_shell) name: &'static str,
    pub(in crate::tui_shell) aliases: &'static [&'static str],
    pub(in crate::tui_shell) usage: &'static str,
    pub(in crate::tui_shell) help: &'static str,
    /// Available on every page.
    pub(in crate::tui_shell) global: bool,
}

pub(in crate::tui_shell) enum Page {
    Login(LoginPage<FileStore, SystemClock>),
    Register(RegisterPage<FileStore, SystemClock>),
    Landing(LandingPage<FileStore, SystemClock>),
    Services(ServicesPage<FileStore, SystemClock>),
}

impl Page {
    pub(in crate::tui_shell) fn context(&self) -> &Ctx {
        match self {
            Page::Login(p) => p.context(),
            Page::Register(p) => p.context(),
            Page::Landing(p) => p.context(),
            Page::Services(p) => p.context(),
        }
    }

    pub(in crate::tui_shell) fn context_mut(&mut self) -> &mut Ctx {
        match self {
            Page::Login(p) => p.context_mut(),
            Page::Register(p) => p.context_mut(),
            Page::Landing(p) => p.context_mut(),
            Page::Services(p) => p.context_mut(),
        }
    }

    pub(in crate::tui_shell) fn name(&self) -> &'static str {
        match self {
            Page::Login(_) => "login",
            Page::Register(_) => "register",
            Page::Landing(_) => "landing",
            Page::Services(_) => "services",
        }
    }
}

#[derive(Clone, Debug)]
pub(in crate::tui_shell) struct OutputLine {
    pub(in crate::tui_shell) text: String,
    pub(in crate::tui_shell) is_error: bool,
}

pub(in crate::tui_shell) struct App {
    store: FileStore,
    pub(in crate::tui_shell) config: ClientConfig,
    pub(in crate::tui_shell) api: ApiClient,
    pub(in crate::tui_shell) page: Page,
    /// Session shown in the header, re-read after every command.
    pub(in crate::tui_shell) session: Option<Session>,

    pub(in crate::tui_shell) input: Input,
    pub(in crate::tui_shell) suggestions: Vec<CommandDef>,
    pub(in crate::tui_shell) suggestion_selected: usize,
    pub(in crate::tui_shell) output: Vec<OutputLine>,
    pub(in crate::tui_shell) quit: bool,
}

impl App {
    fn load(config: ClientConfig) -> Result<Self> {
        let store = FileStore::open(&config.data_dir)?;
        let api = ApiClient::new(&config)?;
        let ctx = PageContext::load(store.clone(), SystemClock)?;
        let page = Page::Login(LoginPage::load(ctx)?);
        let mut app = Self {
            store,
            config,
            api,
            page,
            session: None,
            input: Input::default(),
            suggestions: Vec::new(),
            suggestion_selected: 0,
            output: Vec::new(),
            quit: false,
        };
        app.refresh_session();
        app.push_output(vec!["type `help` for the commands of this page".to_string()]);
        Ok(app)
    }

    /// Drops the current page and loads `to`. Loading shows any notification the
    /// previous page left behind.
    fn open(&mut self, to: Navigation) -> Result<()> {
        tracing::info!(?to, "open page");
        let ctx = PageContext::load(self.store.clone(), SystemClock)?;
        self.page = match to {
            Navigation::Login => Page::Login(LoginPage::load(ctx)?),
            Navigation::Register => Page::Register(RegisterPage::load(ctx)),
            Navigation::Landing => {
                let mut page = LandingPage::new(ctx);
                page.load(&self.api);
                Page::Landing(page)
            }
            Navigation::Services { category } => {
                Page::Services(ServicesPage::load(ctx, category, &self.api)?)
            }
        };
        Ok(())
    }

    /// Follows recorded navigations until a page settles; a guarded page can bounce
    /// straight on to login.
    pub(in crate::tui_shell) fn follow_navigation(&mut self) {
        while let Some(to) = self.page.context_mut().take_navigation() {
            if let Err(err) = self.open(to) {
                self.push_error(format!("{:#}", err));
                break;
            }
        }
        self.refresh_session();
        self.recompute_suggestions();
    }

    fn refresh_session(&mut self) {
        self.session = match self.page.context().gate().get_session() {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "reading session failed");
                None
            }
        };
    }

    pub(in crate::tui_shell) fn tick(&mut self) {
        self.page.context_mut().tick();
    }

    pub(in crate::tui_shell) fn confirm_open(&self) -> bool {
        matches!(&self.page, Page::Services(p) if p.confirm().is_open())
    }

    pub(in crate::tui_shell) fn push_output(&mut self, lines: Vec<String>) {
        self.output.extend(lines.into_iter().map(|text| OutputLine {
            text,
            is_error: false,
        }));
        self.trim_output();
    }

    pub(in crate::tui_shell) fn push_error(&mut self, text: String) {
        tracing::warn!(error = %text, "command failed");
        self.output.push(OutputLine {
            text,
            is_error: true,
        });
        self.trim_output();
    }

    fn trim_output(&mut self) {
        if self.output.len() > OUTPUT_LIMIT {
            let excess = self.output.len() - OUTPUT_LIMIT;
            self.output.drain(..excess);
        }
    }

    pub(in crate::tui_shell) fn prompt(&self) -> String {
        format!("{}>", self.page.name())
    }

    pub(in crate::tui_shell) fn recompute_suggestions(&mut self) {
        let raw = self.input.buf.trim_start();

        // While typing `cat <name>` the category picker suggests, not the command list.
        if let Page::Services(p) = &mut self.page {
            let query = raw.strip_prefix("cat ").unwrap_or_default().trim_start();
            p.active_form_mut().picker.query = query.to_string();
        }

        let first = raw.split_whitespace().next().unwrap_or("");
        if first.is_empty() || raw.contains(' ') {
            self.suggestions.clear();
            self.suggestion_selected = 0;
            return;
        }

        let mut scored: Vec<(i32, CommandDef)> = command_defs(&self.page)
            .into_iter()
            .map(|d| (score_command(first, &d), d))
            .filter(|(s, _)| *s > 0)
            .collect();
        sort_suggestions(&mut scored);
        self.suggestions = scored.into_iter().map(|(_, d)| d).collect();
        self.suggestion_selected = self
            .suggestion_selected
            .min(self.suggestions.len().saturating_sub(1));
    }

    pub(in crate::tui_shell) fn apply_selected_suggestion(&mut self) {
        let Some(def) = self.suggestions.get(self.suggestion_selected) else {
            return;
        };
        self.input.set(format!("{} ", def.name));
        self.recompute_suggestions();
    }

    /// Tab on `cat <partial>` completes to the first category suggestion.
    pub(in crate::tui_shell) fn complete_category(&mut self) -> bool {
        let Page::Services(p) = &self.page else {
            return false;
        };
        let Some(name) = p
            .active_form()
            .picker
            .suggestions(p.categories())
            .first()
            .map(|c| c.name.clone())
        else {
            return false;
        };
        self.input.set(format!("cat {}", name));
        self.recompute_suggestions();
        true
    }

    pub(in crate::tui_shell) fn run_current_input(&mut self) {
        let line = self.input.buf.trim().to_string();
        self.input.push_history(&line);
        self.input.clear();
        if line.is_empty() {
            return;
        }
        tracing::debug!(line = %super::commands::redact(&line), "run command");
        if let Err(err) = dispatch::run_command(self, &line) {
            self.push_error(format!("{:#}", err));
        }
        self.follow_navigation();
    }
}
