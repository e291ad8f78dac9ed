//! Typewriter reveal for system replies
//!
//! Each reply gets its own [`Typewriter`], a small state machine that grows
//! the visible prefix one character per interval until the whole text is
//! shown. [`RevealSet`] holds the typewriters that are still running, keyed
//! by the index of the message they belong to.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(18);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Revealing { shown: usize },
    Complete,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    total: usize,
    state: RevealState,
    interval: Duration,
    pending: Duration,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, interval: Duration) -> Self {
        let text = text.into();
        let total = text.chars().count();
        let state = if total == 0 {
            RevealState::Complete
        } else {
            RevealState::Revealing { shown: 0 }
        };

        Self {
            text,
            total,
            state,
            interval,
            pending: Duration::ZERO,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == RevealState::Complete
    }

    /// Number of characters currently visible
    pub fn shown(&self) -> usize {
        match self.state {
            RevealState::Revealing { shown } => shown,
            RevealState::Complete => self.total,
        }
    }

    pub fn visible(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.shown())
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// Reveal one more character. Returns false once already complete.
    pub fn step(&mut self) -> bool {
        match self.state {
            RevealState::Revealing { shown } => {
                let next = shown + 1;
                self.state = if next >= self.total {
                    RevealState::Complete
                } else {
                    RevealState::Revealing { shown: next }
                };
                true
            }
            RevealState::Complete => false,
        }
    }

    /// Account for `elapsed` time, stepping once per whole interval.
    /// Returns the number of steps taken.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.is_complete() {
            return 0;
        }
        if self.interval.is_zero() {
            let remaining = self.total - self.shown();
            self.skip();
            return remaining;
        }

        self.pending += elapsed;
        let mut steps = 0;
        while self.pending >= self.interval && self.step() {
            self.pending -= self.interval;
            steps += 1;
        }
        if self.is_complete() {
            self.pending = Duration::ZERO;
        }
        steps
    }

    pub fn skip(&mut self) {
        self.state = RevealState::Complete;
        self.pending = Duration::ZERO;
    }
}

/// Typewriters still revealing, one per system message
#[derive(Debug)]
pub struct RevealSet {
    active: BTreeMap<usize, (Typewriter, Instant)>,
    interval: Duration,
}

impl RevealSet {
    pub fn new(interval: Duration) -> Self {
        Self {
            active: BTreeMap::new(),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start revealing `text` for the message at `index`, replacing any
    /// reveal already running for it.
    pub fn start(&mut self, index: usize, text: &str, now: Instant) {
        let typewriter = Typewriter::new(text, self.interval);
        if typewriter.is_complete() {
            self.active.remove(&index);
        } else {
            self.active.insert(index, (typewriter, now));
        }
    }

    /// Advance every running reveal by the time since it last moved. Finished
    /// reveals are dropped. Returns true when any visible text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for (typewriter, last) in self.active.values_mut() {
            let steps = typewriter.advance(now.saturating_duration_since(*last));
            *last = now;
            changed |= steps > 0;
        }
        self.active.retain(|_, (typewriter, _)| !typewriter.is_complete());
        changed
    }

    /// Prefix to display for the message at `index`, or None when it is not
    /// revealing and should be shown in full
    pub fn visible(&self, index: usize) -> Option<&str> {
        self.active.get(&index).map(|(typewriter, _)| typewriter.visible())
    }

    pub fn is_revealing(&self, index: usize) -> bool {
        self.active.contains_key(&index)
    }

    /// Stop the reveal for a message that is no longer displayed
    #[cfg(test)]
    pub fn cancel(&mut self, index: usize) {
        self.active.remove(&index);
    }

    pub fn skip_all(&mut self) {
        self.active.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_full_text_after_exactly_n_steps() {
        let mut tw = Typewriter::new("hello", DEFAULT_REVEAL_INTERVAL);
        for expected in ["h", "he", "hel", "hell"] {
            assert!(tw.step());
            assert_eq!(tw.visible(), expected);
            assert!(!tw.is_complete());
        }
        assert!(tw.step());
        assert_eq!(tw.visible(), "hello");
        assert!(tw.is_complete());

        assert!(!tw.step());
        assert_eq!(tw.shown(), 5);
    }

    #[test]
    fn test_empty_text_starts_complete() {
        let tw = Typewriter::new("", DEFAULT_REVEAL_INTERVAL);
        assert!(tw.is_complete());
        assert_eq!(tw.visible(), "");
    }

    #[test]
    fn test_multibyte_prefixes() {
        let mut tw = Typewriter::new("héé", DEFAULT_REVEAL_INTERVAL);
        tw.step();
        tw.step();
        assert_eq!(tw.visible(), "hé");
        assert_eq!(tw.shown(), 2);
    }

    #[test]
    fn test_advance_steps_per_interval() {
        let interval = Duration::from_millis(18);
        let mut tw = Typewriter::new("abcdef", interval);

        assert_eq!(tw.advance(Duration::from_millis(10)), 0);
        assert_eq!(tw.visible(), "");
        assert_eq!(tw.advance(Duration::from_millis(10)), 1);
        assert_eq!(tw.visible(), "a");
        assert_eq!(tw.advance(Duration::from_millis(36)), 2);
        assert_eq!(tw.visible(), "abc");

        assert_eq!(tw.advance(Duration::from_secs(10)), 3);
        assert!(tw.is_complete());
        assert_eq!(tw.visible(), "abcdef");
        assert_eq!(tw.advance(Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_skip_completes() {
        let mut tw = Typewriter::new("abc", DEFAULT_REVEAL_INTERVAL);
        tw.skip();
        assert!(tw.is_complete());
        assert_eq!(tw.visible(), "abc");
    }

    #[test]
    fn test_reveal_set_runs_independently() {
        let interval = Duration::from_millis(18);
        let start = Instant::now();
        let mut set = RevealSet::new(interval);

        set.start(1, "abcd", start);
        set.tick(start + interval * 2);
        assert_eq!(set.visible(1), Some("ab"));

        set.start(3, "xyz", start + interval * 2);
        assert!(set.tick(start + interval * 3));
        assert_eq!(set.visible(1), Some("abc"));
        assert_eq!(set.visible(3), Some("x"));

        set.tick(start + interval * 4);
        assert!(!set.is_revealing(1));
        assert_eq!(set.visible(1), None);
        assert_eq!(set.visible(3), Some("xy"));
    }

    #[test]
    fn test_reveal_set_cancel_and_skip() {
        let now = Instant::now();
        let mut set = RevealSet::new(DEFAULT_REVEAL_INTERVAL);
        set.start(0, "abc", now);
        set.start(1, "def", now);
        set.start(2, "", now);
        assert!(!set.is_revealing(2));

        set.cancel(0);
        assert!(!set.is_revealing(0));
        assert!(set.is_revealing(1));

        set.skip_all();
        assert!(set.is_idle());
        assert!(!set.tick(now + Duration::from_secs(1)));
    }
}
