//! Page bodies as styled lines. Kept generic over the store and clock so they can be
//! rendered from in-memory pages.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::api::ProbeTarget;
use crate::clock::Clock;
use crate::pages::{
    InlineMessage, LandingPage, LandingState, LoginPage, LoginView, RegisterPage, ServiceForm,
    ServicesPage,
};
use crate::storage::KeyValueStore;

use super::Page;

pub(super) fn page_lines(page: &Page) -> Vec<Line<'static>> {
    match page {
        Page::Login(p) => login_lines(p),
        Page::Register(p) => register_lines(p),
        Page::Landing(p) => landing_lines(p),
        Page::Services(p) => services_lines(p),
    }
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn dim(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::Gray)))
}

fn inline(msg: &InlineMessage) -> Line<'static> {
    let color = if msg.is_error { Color::Red } else { Color::Green };
    Line::from(Span::styled(msg.text.clone(), Style::default().fg(color)))
}

fn price(p: f64) -> String {
    format!("${:.2}", p)
}

pub(super) fn login_lines<S: KeyValueStore, C: Clock>(page: &LoginPage<S, C>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match page.view() {
        LoginView::Form => {
            lines.push(heading("Log in"));
            lines.push(dim("signin <email> <password>    or `register` to create an account"));
        }
        LoginView::Welcome(w) => {
            lines.push(heading(format!("Welcome, {}", w.identity)));
            lines.push(Line::from(vec![
                Span::raw("Role: "),
                Span::styled(w.role.to_string(), Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(""));
            for target in &w.probes {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{: <20}", target.label()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        format!("probe {}", probe_arg(*target)),
                        Style::default().fg(Color::Gray),
                    ),
                ]));
                if let Some(msg) = page.probe_message(*target) {
                    lines.push(inline(msg));
                }
            }
        }
    }
    if let Some(msg) = page.message() {
        lines.push(Line::from(""));
        lines.push(inline(msg));
    }
    lines
}

fn probe_arg(target: ProbeTarget) -> &'static str {
    match target {
        ProbeTarget::ClientDashboard => "client",
        ProbeTarget::FreelancerProfile => "freelancer",
        ProbeTarget::AdminPanel => "admin",
    }
}

pub(super) fn register_lines<S: KeyValueStore, C: Clock>(
    page: &RegisterPage<S, C>,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Create an account"),
        dim("signup <email> <password> [client|freelancer]"),
    ];
    if let Some(msg) = page.message() {
        lines.push(Line::from(""));
        lines.push(inline(msg));
    }
    lines
}

pub(super) fn landing_lines<S: KeyValueStore, C: Clock>(
    page: &LandingPage<S, C>,
) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Browse by category")];
    match page.state() {
        LandingState::Loading => lines.push(dim("Loading categories...")),
        LandingState::Empty => lines.push(dim("No categories to show yet.")),
        LandingState::Failed(text) => lines.push(Line::from(Span::styled(
            text.clone(),
            Style::default().fg(Color::Red),
        ))),
        LandingState::Loaded(cards) => {
            for (i, card) in cards.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(format!("{: >2}. ", i + 1), Style::default().fg(Color::Gray)),
                    Span::styled(card.name.clone(), Style::default().fg(Color::Yellow)),
                ]));
                if card.samples.is_empty() {
                    lines.push(dim("      no services yet"));
                }
                for s in &card.samples {
                    lines.push(Line::from(format!("      {}  {}", s.title, price(s.price))));
                }
            }
            lines.push(dim("open <n> shows the services of a category"));
        }
    }
    lines
}

pub(super) fn services_lines<S: KeyValueStore, C: Clock>(
    page: &ServicesPage<S, C>,
) -> Vec<Line<'static>> {
    let listing = page.listing();
    let mut lines = vec![heading(listing.title.clone())];

    let mut filters = Vec::new();
    if !page.search.trim().is_empty() {
        filters.push(format!("search={:?}", page.search.trim()));
    }
    if page.toggle_visible() {
        let state = if page.showing_mine() { "on" } else { "off" };
        filters.push(format!("mine={}", state));
    }
    if !filters.is_empty() {
        lines.push(dim(filters.join("  ")));
    }

    if let Some(err) = &listing.error {
        lines.push(Line::from(Span::styled(
            format!("Error loading services: {}", err),
            Style::default().fg(Color::Red),
        )));
    } else if listing.no_services {
        lines.push(dim("No services found."));
    }
    for card in &listing.cards {
        let s = &card.service;
        let mut spans = vec![
            Span::styled(format!("#{: <4}", s.id), Style::default().fg(Color::Gray)),
            Span::styled(s.title.clone(), Style::default().fg(Color::Yellow)),
            Span::raw(format!("  {}", price(s.price))),
            Span::styled(
                format!("  [{}]", s.category_names().join(", ")),
                Style::default().fg(Color::Cyan),
            ),
        ];
        if card.can_manage {
            spans.push(Span::styled("  (edit)", Style::default().fg(Color::Green)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(manage) = page.manage() {
        lines.push(Line::from(""));
        lines.push(heading(format!("Managing #{}", manage.service.id)));
        form_lines(&mut lines, &manage.form, page.categories());
        lines.push(dim("save | delete | cancel"));
    } else if page.create_visible() {
        lines.push(Line::from(""));
        lines.push(heading("Publish a service"));
        form_lines(&mut lines, &page.create_form, page.categories());
        lines.push(dim("title | desc | price | cat | uncat, then publish"));
    }
    lines
}

fn form_lines(lines: &mut Vec<Line<'static>>, form: &ServiceForm, all: &[crate::api::Category]) {
    let field = |label: &str, value: &str| {
        let shown = if value.is_empty() { "-" } else { value };
        Line::from(vec![
            Span::styled(format!("{: <12}", label), Style::default().fg(Color::Gray)),
            Span::raw(shown.to_string()),
        ])
    };
    lines.push(field("Title", &form.title));
    lines.push(field("Description", &form.description));
    lines.push(field("Price", &form.price));
    let selected: Vec<&str> = form.picker.selected().iter().map(|c| c.name.as_str()).collect();
    lines.push(field("Categories", &selected.join(", ")));

    let suggestions = form.picker.suggestions(all);
    if !suggestions.is_empty() {
        let names: Vec<&str> = suggestions.iter().map(|c| c.name.as_str()).collect();
        lines.push(Line::from(Span::styled(
            format!("            > {}", names.join("  ")),
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/views_tests.rs"]
mod tests;
