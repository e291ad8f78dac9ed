use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app::App;
use crate::dispatch::{self, ChatClient};
use crate::session::InputEdit;
use crate::tui::AppEvent;

/// Apply one event to the app. Returns true when the screen needs a redraw.
pub fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) -> Result<bool> {
    let redraw = match event {
        AppEvent::Key(key) => {
            handle_key(app, key, tx);
            true
        }
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => true,
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Reveal => !app.reveals.is_idle() && app.tick_reveals(Instant::now()),
        AppEvent::Settled(outcome) => {
            app.settle(outcome, Instant::now());
            true
        }
    };
    Ok(redraw)
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,

        KeyCode::Enter => {
            if let Some(text) = app.session.submit() {
                debug!(outstanding = app.session.outstanding(), "dispatching message");
                spawn_dispatch(app.client.clone(), text, tx.clone());
            }
        }

        // Transcript scrolling
        KeyCode::PageUp => {
            let rows = app.half_page();
            app.scroll_up(rows);
        }
        KeyCode::PageDown => {
            let rows = app.half_page();
            app.scroll_down(rows);
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),

        KeyCode::Tab => app.skip_reveals(),

        // Input line editing
        KeyCode::Backspace => app.session.edit(InputEdit::Backspace),
        KeyCode::Delete => app.session.edit(InputEdit::Delete),
        KeyCode::Left => app.session.edit(InputEdit::Left),
        KeyCode::Right => app.session.edit(InputEdit::Right),
        KeyCode::Home => app.session.edit(InputEdit::Home),
        KeyCode::End => app.session.edit(InputEdit::End),
        KeyCode::Char(c)
            if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT =>
        {
            app.session.edit(InputEdit::Insert(c))
        }

        _ => {}
    }
}

/// Run one dispatch in the background and report its outcome into the
/// event loop. The request runs on its own task so a panic there still
/// produces a `Settled` event.
pub fn spawn_dispatch(client: ChatClient, text: String, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let request = tokio::spawn(async move { client.send(&text).await });
        let outcome = dispatch::settle(request).await;
        if tx.send(AppEvent::Settled(outcome)).is_err() {
            debug!("event loop closed before dispatch settled");
        }
    });
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) -> bool {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return false;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            true
        }
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            true
        }
        _ => false,
    }
}
