use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::config::CloseStyle;
use crate::locale::Direction;
use crate::message::Sender;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    if !app.controller.is_open {
        render_closed(app, frame, area);
        return;
    }

    if app.controller.is_minimized {
        render_minimized(app, frame, area);
        return;
    }

    // Input grows with the draft, within the configured bounds
    let input_rows = app.controller.input_height(area.width.saturating_sub(2).max(1));
    let [header_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(input_rows + 2),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
}

/// Collapsed launcher, the storefront's floating chat button
fn render_closed(app: &App, frame: &mut Frame, area: Rect) {
    let strings = app.controller.strings();
    let hint = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            format!("💬 {}", strings.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Press o to open the chat, q to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(hint, area);
}

/// Header-only bar while minimized; transcript and state stay intact
fn render_minimized(app: &App, frame: &mut Frame, area: Rect) {
    let strings = app.controller.strings();
    let [bar_area, _] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            strings.title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  (m to restore)", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(bar, bar_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let strings = app.controller.strings();
    let button = match app.controller.options().close_style {
        CloseStyle::Minimize => "[m] −",
        CloseStyle::Dismiss => "[x] ✕",
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            strings.title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(button, Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let strings = app.controller.strings();
    let rtl = app.controller.direction() == Direction::RightToLeft;

    // Store dimensions for scroll math (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();

    for message in app.controller.transcript() {
        match message.sender {
            Sender::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for line in message.text.lines() {
                    lines.push(Line::from(line.to_string()));
                }
            }
            Sender::Assistant => {
                lines.push(Line::from(Span::styled(
                    format!("{}:", strings.title),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                let body_style = if message.error {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                for line in message.text.lines() {
                    lines.push(Line::from(Span::styled(line.to_string(), body_style)));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.controller.is_processing() {
        lines.push(Line::from(Span::styled(
            format!("{}:", strings.title),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("{}{}", strings.loading, dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let alignment = if rtl { Alignment::Right } else { Alignment::Left };
    let transcript = Paragraph::new(Text::from(lines))
        .alignment(alignment)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true })
        .scroll((app.scroll, 0));

    frame.render_widget(transcript, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let strings = app.controller.strings();
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} (Enter) ", strings.send_button));

    let inner_width = area.width.saturating_sub(2) as usize;
    let draft = &app.controller.draft;

    if draft.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            strings.placeholder,
            Style::default().fg(Color::DarkGray),
        ))
        .block(input_block);
        frame.render_widget(placeholder, area);
    } else {
        // Horizontal scroll keeps the cursor visible in long drafts
        let scroll_offset = if inner_width == 0 {
            0
        } else if app.cursor >= inner_width {
            app.cursor - inner_width + 1
        } else {
            0
        };

        let visible_text: String = draft
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();

        let input = Paragraph::new(visible_text)
            .style(Style::default().fg(Color::Cyan))
            .block(input_block);
        frame.render_widget(input, area);

        if editing {
            let cursor_x = (app.cursor - scroll_offset) as u16;
            frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
        }
    }

    // Cursor at the start of an empty draft
    if draft.is_empty() && editing {
        frame.set_cursor_position((area.x + 1, area.y + 1));
    }
}
