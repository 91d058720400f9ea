use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use wallet_challenge_lib::config;
use wallet_challenge_lib::feedback::FeedbackStyle;
use wallet_challenge_lib::form::FormField;
use wallet_challenge_lib::session::ExecuteState;
use wallet_challenge_lib::settings::Endpoint;

/// Render the form: endpoint selector, four inputs, execute button
pub fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} v{}", config::APP_NAME, config::APP_VERSION),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    // Endpoint selector: both options, selected one highlighted
    let mut endpoint_spans = vec![focus_marker(app, Focus::Endpoint), label("Endpoint")];
    for endpoint in [Endpoint::Sandbox, Endpoint::Production] {
        let style = if endpoint == app.session.endpoint() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        endpoint_spans.push(Span::styled(format!("[{}] ", endpoint.label()), style));
    }
    lines.push(Line::from(endpoint_spans));
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled(app.session.endpoint().url(), Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));

    lines.push(input_line(app, Focus::AppId, "App ID", app.session.app_id().to_string()));
    for field in FormField::REQUIRED {
        let value = app.session.form().field(field);
        let shown = if field == FormField::SecretKey {
            "•".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        lines.push(input_line(app, focus_for(field), field.label(), shown));
    }
    lines.push(Line::from(""));

    let pending = app.session.state() == ExecuteState::Pending;
    let button_text = if pending { "[ Executing… ]" } else { "[ Execute ]" };
    let button_style = if app.focus == Focus::Execute {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    lines.push(Line::from(vec![
        focus_marker(app, Focus::Execute),
        Span::styled(button_text, button_style),
    ]));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn focus_for(field: FormField) -> Focus {
    match field {
        FormField::UserToken => Focus::UserToken,
        FormField::SecretKey => Focus::SecretKey,
        FormField::ChallengeId => Focus::ChallengeId,
    }
}

fn focus_marker(app: &App, row: Focus) -> Span<'static> {
    if app.focus == row {
        Span::styled("→ ", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("  ")
    }
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{:<14}", format!("{}:", text)), Style::default().fg(Color::DarkGray))
}

fn input_line(app: &App, row: Focus, name: &str, value: String) -> Line<'static> {
    let focused = app.focus == row;
    let value = if focused { format!("{}_", value) } else { value };
    let style = if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![focus_marker(app, row), label(name), Span::styled(value, style)])
}

/// Render recent feedback, newest first
pub fn render_history(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Recent", Style::default().fg(Color::White).add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];

    let mut history = app.session.feedback().history().peekable();
    if history.peek().is_none() {
        lines.push(Line::from(Span::styled("Nothing yet", Style::default().fg(Color::DarkGray))));
    }
    for entry in history {
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", entry.at.format("%H:%M:%S")), Style::default().fg(Color::DarkGray)),
            Span::styled(entry.message.clone(), Style::default().fg(style_color(entry.style))),
        ]));
    }

    let block = Block::default().borders(Borders::LEFT).border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn style_color(style: FeedbackStyle) -> Color {
    match style {
        FeedbackStyle::General => Color::Gray,
        FeedbackStyle::Success => Color::Green,
        FeedbackStyle::Failure => Color::Red,
    }
}

/// Render the active toast over the bottom of `area`
pub fn render_toast(f: &mut Frame, app: &App, area: Rect) {
    let Some(toast) = app.session.feedback().active() else {
        return;
    };

    let bg = match toast.style {
        FeedbackStyle::General => Color::DarkGray,
        FeedbackStyle::Success => Color::Green,
        FeedbackStyle::Failure => Color::Red,
    };

    let width = toast_width(toast.message.chars().count(), area.width);
    let toast_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(2),
        width,
        height: 1u16.min(area.height),
    };

    f.render_widget(Clear, toast_area);
    f.render_widget(
        Paragraph::new(format!("  {}  ", toast.message))
            .style(Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD)),
        toast_area,
    );
}

/// Message plus two cells of padding each side, clamped to `max`
fn toast_width(message_chars: usize, max: u16) -> u16 {
    u16::try_from(message_chars)
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(max)
}

/// Render the SDK's modal while it is up
pub fn render_modal(f: &mut Frame, app: &App, area: Rect) {
    let Some(title) = &app.modal else {
        return;
    };

    let width = 44u16.min(area.width);
    let height = 5u16.min(area.height);
    let modal_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Wallet SDK is handling the challenge…", Style::default().fg(Color::White))),
    ];
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, modal_area);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), modal_area);
}

/// Render hints bar (no borders, minimal)
pub fn render_hints(f: &mut Frame, app: &App, area: Rect) {
    let hint = match app.focus {
        Focus::Endpoint => " ←→ switch endpoint",
        Focus::Execute => " Enter execute",
        _ => " type to edit  Ctrl+V paste",
    };

    let lines = vec![
        Line::from(Span::styled("─".repeat(area.width as usize), Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::styled("Tab/↑↓", Style::default().fg(Color::DarkGray)),
            Span::styled(" move  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Ctrl+E", Style::default().fg(Color::DarkGray)),
            Span::styled(" execute  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::DarkGray)),
            Span::styled(" hide toast  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Ctrl+Q", Style::default().fg(Color::DarkGray)),
            Span::styled(" quit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("│", Style::default().fg(Color::DarkGray)),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
        ]),
    ];

    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::sync::mpsc;
    use wallet_challenge_lib::feedback::FeedbackEvent;
    use wallet_challenge_lib::sdk::RecordingSdk;
    use wallet_challenge_lib::session::Session;
    use wallet_challenge_lib::storage::MemoryStore;

    fn app_with_toast(event: FeedbackEvent) -> App {
        let session = Session::start(Arc::new(RecordingSdk::new()), Box::new(MemoryStore::default()), Endpoint::Sandbox);
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(session, tx);
        app.session.feedback_mut().raise(event, Instant::now());
        app
    }

    #[test]
    fn test_toast_width_saturates() {
        assert_eq!(toast_width(10, 80), 14);
        assert_eq!(toast_width(65_532, u16::MAX), u16::MAX);
        assert_eq!(toast_width(65_535, 80), 80);
        assert_eq!(toast_width(usize::MAX, 80), 80);
    }

    #[test]
    fn test_huge_failure_toast_renders_clamped() {
        let message = format!("Error: {}", "x".repeat(65_526));
        let app = app_with_toast(FeedbackEvent::failure(message));
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();

        terminal
            .draw(|f| {
                let area = f.area();
                render_toast(f, &app, area);
            })
            .unwrap();

        // Toast sits on the second-to-last row and fills the full width
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 8)].bg, Color::Red);
        assert_eq!(buffer[(39, 8)].bg, Color::Red);
    }

    #[test]
    fn test_short_toast_is_centered() {
        let app = app_with_toast(FeedbackEvent::general("hi"));
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();

        terminal
            .draw(|f| {
                let area = f.area();
                render_toast(f, &app, area);
            })
            .unwrap();

        // width 6 centered in 40 columns starts at x = 17
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(16, 8)].bg, Color::Reset);
        assert_eq!(buffer[(17, 8)].bg, Color::DarkGray);
        assert_eq!(buffer[(22, 8)].bg, Color::DarkGray);
        assert_eq!(buffer[(23, 8)].bg, Color::Reset);
    }
}
