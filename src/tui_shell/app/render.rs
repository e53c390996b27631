use super::*;

fn kind_color(kind: NotificationKind) -> Color {
    match kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
        NotificationKind::Warning => Color::Yellow,
        NotificationKind::Info => Color::Cyan,
    }
}

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(6),
            Constraint::Length(if app.suggestions.is_empty() { 0 } else { 7 }),
            Constraint::Length(2),
        ])
        .split(area);

    // Header
    let mut spans = vec![
        Span::styled(
            "RedFreelance",
            Style::default().fg(Color::White).bg(Color::Red),
        ),
        Span::raw("  "),
        Span::styled(app.page.name(), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
    ];
    match &app.session {
        Some(s) => spans.push(Span::styled(
            format!("{} ({})", s.identity, s.role),
            Style::default().fg(Color::Green),
        )),
        None => spans.push(Span::styled("not logged in", Style::default().fg(Color::Gray))),
    }
    spans.push(Span::styled(
        format!("  {}", app.config.catalog_url),
        Style::default().fg(Color::DarkGray),
    ));
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    // Page body
    frame.render_widget(
        Paragraph::new(views::page_lines(&app.page)).wrap(Wrap { trim: false }),
        chunks[1],
    );

    // Output, newest at the bottom
    {
        let inner_h = chunks[2].height.saturating_sub(1) as usize;
        let start = app.output.len().saturating_sub(inner_h);
        let lines: Vec<Line> = app.output[start..]
            .iter()
            .map(|l| {
                let style = if l.is_error {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(l.text.as_str(), style))
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::TOP).title("Output")),
            chunks[2],
        );
    }

    // Suggestions
    if !app.suggestions.is_empty() {
        let total = app.suggestions.len();
        let sel_idx = app.suggestion_selected.min(total.saturating_sub(1));
        let max_items = (chunks[3].height.saturating_sub(2) as usize).max(1);
        let start = (sel_idx + 1).saturating_sub(max_items);
        let end = (start + max_items).min(total);

        let mut s_lines = vec![Line::from(Span::styled(
            format!("Suggestions {}/{}", sel_idx + 1, total),
            Style::default().fg(Color::Gray),
        ))];
        for (i, s) in app.suggestions.iter().enumerate().take(end).skip(start) {
            let style = if i == sel_idx {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            s_lines.push(Line::from(vec![
                Span::styled(format!("{: <34}", s.usage), style.fg(Color::Yellow)),
                Span::styled(s.help, style.fg(Color::White)),
            ]));
        }
        frame.render_widget(
            Paragraph::new(s_lines).block(Block::default().borders(Borders::TOP)),
            chunks[3],
        );
    }

    // Input
    let prompt = app.prompt();
    let input_line = Line::from(vec![
        Span::styled(prompt.clone(), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::raw(app.input.buf.as_str()),
    ]);
    frame.render_widget(
        Paragraph::new(input_line).block(Block::default().borders(Borders::TOP)),
        chunks[4],
    );

    draw_toast(frame, app.page.context());

    if let Page::Services(p) = &app.page {
        if let Some(request) = p.confirm().request() {
            dim_frame(frame);
            modal::draw_confirm(frame, request);
            return;
        }
    }

    let x = prompt.chars().count() as u16 + 1 + app.input.cursor as u16;
    frame.set_cursor_position((chunks[4].x + x, chunks[4].y + 1));
}

/// Bottom-right corner, above the input line. Entering and leaving toasts are drawn
/// dimmed.
fn draw_toast(frame: &mut ratatui::Frame, ctx: &Ctx) {
    let toaster = ctx.toaster();
    let phase = toaster.phase();
    let Some(n) = toaster.current() else {
        return;
    };
    if phase == ToastPhase::Hidden {
        return;
    }

    let area = frame.area();
    let text = format!("{} {}", n.kind.icon(), n.message);
    let (w, h) = toast_size(text.chars().count(), area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(w.saturating_add(1)),
        y: area.y + area.height.saturating_sub(h.saturating_add(3)),
        width: w.min(area.width),
        height: h.min(area.height),
    };

    let mut style = Style::default().fg(kind_color(n.kind));
    if phase != ToastPhase::Visible {
        style = style.add_modifier(Modifier::DIM);
    }
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(n.kind.label()),
            ),
        rect,
    );
}

/// Width and height of a toast holding `len` characters. Long messages wrap; the
/// height is left for the caller to clip to the frame.
fn toast_size(len: usize, area_width: u16) -> (u16, u16) {
    let max_w = usize::from((area_width / 2).max(20));
    let w = len.saturating_add(4).clamp(20, max_w);
    let h = 3 + len / (w - 4);
    (
        u16::try_from(w).unwrap_or(u16::MAX),
        u16::try_from(h).unwrap_or(u16::MAX),
    )
}

fn dim_frame(frame: &mut ratatui::Frame) {
    let area = frame.area();
    let buf = frame.buffer_mut();
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.modifier |= Modifier::DIM;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/tui_shell/render_tests.rs"]
mod tests;
