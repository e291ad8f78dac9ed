use std::time::Instant;

use anyhow::Result;
use ratatui::layout::Rect;

use crate::config::Settings;
use crate::dispatch::ChatClient;
use crate::error::DispatchError;
use crate::session::ChatSession;
use crate::typewriter::RevealSet;

pub const LOADING_LABEL: &str = "vectorizing inputs";

pub struct App {
    // Core state
    pub should_quit: bool,
    pub title: String,
    pub session: ChatSession,
    pub reveals: RevealSet,
    pub client: ChatClient,

    // Loading dots, cycles 0..3 while in flight
    pub animation_frame: u8,

    // Transcript scroll state
    pub scroll: u16,
    pub follow_tail: bool,
    pub chat_height: u16, // Inner height of the transcript area
    pub chat_width: u16,  // Inner width the transcript wraps at
    pub chat_area: Option<Rect>,

    // Last state the view scrolled for
    seen_revision: u64,
    seen_in_flight: bool,
}

impl App {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = ChatClient::new(&settings.endpoint, settings.request_timeout)?;

        Ok(Self {
            should_quit: false,
            title: settings.title.clone(),
            session: ChatSession::new(),
            reveals: RevealSet::new(settings.reveal_interval),
            client,

            animation_frame: 0,

            scroll: 0,
            follow_tail: true,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,

            seen_revision: 0,
            seen_in_flight: false,
        })
    }

    /// Text to draw for the message at `index`: the revealed prefix while a
    /// system reply is still typing out, the full text otherwise
    pub fn display_text(&self, index: usize) -> &str {
        if let Some(prefix) = self.reveals.visible(index) {
            return prefix;
        }
        self.session
            .store()
            .get(index)
            .map(|m| m.text())
            .unwrap_or_default()
    }

    /// Record a finished dispatch and start typing out its reply
    pub fn settle(&mut self, outcome: Result<String, DispatchError>, now: Instant) {
        let index = self.session.settle(outcome);
        if let Some(message) = self.session.store().last() {
            self.reveals.start(index, message.text(), now);
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) -> bool {
        if self.session.is_in_flight() {
            self.animation_frame = (self.animation_frame + 1) % 3;
            true
        } else {
            false
        }
    }

    pub fn tick_reveals(&mut self, now: Instant) -> bool {
        self.reveals.tick(now)
    }

    pub fn skip_reveals(&mut self) {
        self.reveals.skip_all();
    }

    /// Rows the transcript takes when wrapped at the current chat width
    pub fn transcript_height(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 50 };

        let rows = crate::ui::transcript(self).line_count(wrap_width);
        rows.min(u16::MAX as usize) as u16
    }

    fn max_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.transcript_height().saturating_sub(visible_height)
    }

    /// Follow the latest entry whenever the conversation or the in-flight
    /// state changed since the last frame; called before drawing.
    pub fn sync_scroll(&mut self) {
        let revision = self.session.store().revision();
        let in_flight = self.session.is_in_flight();
        if revision != self.seen_revision || in_flight != self.seen_in_flight {
            self.seen_revision = revision;
            self.seen_in_flight = in_flight;
            self.follow_tail = true;
        }

        let max_scroll = self.max_scroll();
        if self.follow_tail {
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_sub(rows);
        self.follow_tail = false;
    }

    pub fn scroll_down(&mut self, rows: u16) {
        let max_scroll = self.max_scroll();
        self.scroll = self.scroll.saturating_add(rows).min(max_scroll);
        self.follow_tail = self.scroll >= max_scroll;
    }

    pub fn half_page(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }
}
