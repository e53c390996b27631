use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::confirm::{ConfirmChoice, ConfirmRequest};
use crate::pages::PendingAction;

use super::{App, Page};

pub(super) fn draw_confirm(frame: &mut ratatui::Frame, request: &ConfirmRequest<PendingAction>) {
    let area = frame.area();
    let w = area.width.saturating_sub(6).clamp(20, 60);
    let h = area.height.saturating_sub(6).clamp(6, 9);
    let box_area = Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    };

    frame.render_widget(Clear, box_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(request.title.as_str());
    frame.render_widget(block.clone(), box_area);
    let inner = block.inner(box_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(request.message.as_str()).wrap(Wrap { trim: false }),
        parts[0],
    );
    let keys = Line::from(vec![
        Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" yes   "),
        Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" no   "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" dismiss"),
    ]);
    frame.render_widget(Paragraph::new(keys).alignment(Alignment::Right), parts[1]);
}

fn choice_for(key: KeyEvent) -> Option<ConfirmChoice> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ConfirmChoice::Dismiss)
        }
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(ConfirmChoice::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(ConfirmChoice::No),
        KeyCode::Esc => Some(ConfirmChoice::Dismiss),
        _ => None,
    }
}

/// Keys go here, and only here, while a confirmation is open.
pub(super) fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    let Some(choice) = choice_for(key) else {
        return;
    };
    let Page::Services(page) = &mut app.page else {
        return;
    };
    tracing::debug!(?choice, "confirmation answered");
    if let Err(err) = page.resolve_confirmation(&app.api, choice) {
        app.push_error(format!("{:#}", err));
    }
    app.follow_navigation();
}
