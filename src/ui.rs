use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use crate::app::{App, LOADING_LABEL};
use crate::message::Sender;

const USER_GREEN: Color = Color::Rgb(0x00, 0xFF, 0x88);
const SYSTEM_GREEN: Color = Color::Rgb(0x00, 0xFF, 0x00);
const PROMPT: &str = "> ";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let terminal_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .style(Style::default().bg(Color::Black).fg(SYSTEM_GREEN));
    let inner = terminal_block.inner(area);
    frame.render_widget(terminal_block, area);

    // Header, transcript, spacer, input line
    let [header_area, chat_area, _, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    render_header(app, frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        app.title.clone(),
        Style::default().fg(SYSTEM_GREEN).bold(),
    )));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing and scroll calculations
    app.chat_area = Some(area);
    app.chat_height = area.height;
    app.chat_width = area.width;
    app.sync_scroll();

    let transcript = transcript(app).scroll((app.scroll, 0));
    frame.render_widget(transcript, area);
}

/// The wrapped transcript, also used to measure its rendered height
pub fn transcript(app: &App) -> Paragraph<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for (index, message) in app.session.messages().iter().enumerate() {
        let text = app.display_text(index);
        match message.sender() {
            Sender::User => {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", PROMPT, text),
                    Style::default().fg(USER_GREEN),
                )));
            }
            Sender::System => {
                if text.is_empty() {
                    lines.push(Line::default());
                }
                for line in text.lines() {
                    lines.push(Line::from(Span::styled(
                        line.to_string(),
                        Style::default().fg(SYSTEM_GREEN),
                    )));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.session.is_in_flight() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("{}{}", LOADING_LABEL, dots),
            Style::default().fg(SYSTEM_GREEN).add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input = app.session.input();
    let prompt_width = PROMPT.chars().count();

    // Calculate visible portion of input with horizontal scrolling
    let inner_width = (area.width as usize).saturating_sub(prompt_width);
    let cursor_pos = input.cursor();

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = input
        .as_str()
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(SYSTEM_GREEN).bold()),
        Span::styled(visible_text, Style::default().fg(SYSTEM_GREEN)),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let cursor_x = (prompt_width + cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x.min(area.width.saturating_sub(1)), area.y));
}
