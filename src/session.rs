use tracing::{debug, info};

use crate::conversation::ConversationStore;
use crate::dispatch::reply_or_fallback;
use crate::error::DispatchError;
use crate::input::InputBuffer;
use crate::message::Message;

/// Edits the view can request on the input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Owns the conversation, the input line and the in-flight state.
///
/// The view only reads through the accessors; every mutation goes through
/// `edit`, `submit` and `settle`.
#[derive(Debug, Default)]
pub struct ChatSession {
    store: ConversationStore,
    input: InputBuffer,
    // Dispatches submitted but not yet settled
    outstanding: usize,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn messages(&self) -> &[Message] {
        self.store.all()
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// True while any dispatch is outstanding. With overlapping submits the
    /// flag stays up until the last one settles, not the first.
    pub fn is_in_flight(&self) -> bool {
        self.outstanding > 0
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn edit(&mut self, edit: InputEdit) {
        match edit {
            InputEdit::Insert(c) => self.input.insert(c),
            InputEdit::Backspace => self.input.backspace(),
            InputEdit::Delete => self.input.delete(),
            InputEdit::Left => self.input.move_left(),
            InputEdit::Right => self.input.move_right(),
            InputEdit::Home => self.input.home(),
            InputEdit::End => self.input.end(),
        }
    }

    /// Move the composed text into the conversation.
    ///
    /// Returns the text to dispatch, or None when the input is blank, in
    /// which case nothing changes.
    pub fn submit(&mut self) -> Option<String> {
        if self.input.is_blank() {
            return None;
        }

        let text = self.input.take();
        self.store.append(Message::user(text.clone()));
        self.outstanding += 1;
        info!(chars = text.chars().count(), outstanding = self.outstanding, "message submitted");

        Some(text)
    }

    /// Record the outcome of one dispatch as a system message and return its
    /// index in the conversation
    pub fn settle(&mut self, outcome: Result<String, DispatchError>) -> usize {
        let reply = reply_or_fallback(outcome);
        let index = self.store.append(Message::system(reply));
        self.outstanding = self.outstanding.saturating_sub(1);
        debug!(index, outstanding = self.outstanding, "dispatch settled");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::FALLBACK_REPLY;
    use crate::message::Sender;

    fn type_text(session: &mut ChatSession, text: &str) {
        for c in text.chars() {
            session.edit(InputEdit::Insert(c));
        }
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut session = ChatSession::new();
        assert_eq!(session.submit(), None);

        type_text(&mut session, "  \t ");
        assert_eq!(session.submit(), None);
        assert!(session.messages().is_empty());
        assert!(!session.is_in_flight());
        assert_eq!(session.input().as_str(), "  \t ");
    }

    #[test]
    fn test_submit_appends_user_and_clears_input() {
        let mut session = ChatSession::new();
        type_text(&mut session, "hello");

        assert_eq!(session.submit().as_deref(), Some("hello"));
        assert_eq!(session.messages(), &[Message::user("hello")]);
        assert_eq!(session.input().as_str(), "");
        assert!(session.is_in_flight());
    }

    #[test]
    fn test_successful_reply_appends_one_system_message() {
        let mut session = ChatSession::new();
        type_text(&mut session, "hello");
        session.submit();

        let index = session.settle(Ok("hi there".to_string()));
        assert_eq!(index, 1);
        assert_eq!(
            session.messages(),
            &[Message::user("hello"), Message::system("hi there")]
        );
        assert!(!session.is_in_flight());
    }

    #[test]
    fn test_empty_reply_is_kept() {
        let mut session = ChatSession::new();
        type_text(&mut session, "hello");
        session.submit();
        session.settle(Ok(String::new()));

        let last = session.store().last().unwrap();
        assert_eq!(last.sender(), Sender::System);
        assert_eq!(last.text(), "");
    }

    #[test]
    fn test_failure_appends_fallback() {
        let mut session = ChatSession::new();
        type_text(&mut session, "hello");
        session.submit();
        session.settle(Err(DispatchError::Aborted("cancelled".to_string())));

        assert_eq!(session.store().last().unwrap().text(), FALLBACK_REPLY);
        assert!(!session.is_in_flight());
    }

    #[test]
    fn test_in_flight_until_every_dispatch_settles() {
        let mut session = ChatSession::new();
        type_text(&mut session, "one");
        session.submit();
        type_text(&mut session, "two");
        session.submit();
        assert_eq!(session.outstanding(), 2);

        session.settle(Ok("second".to_string()));
        assert!(session.is_in_flight());
        session.settle(Ok("first".to_string()));
        assert!(!session.is_in_flight());

        // Replies land in settlement order
        let texts: Vec<&str> = session.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["one", "two", "second", "first"]);
    }

    #[test]
    fn test_stray_settle_does_not_underflow() {
        let mut session = ChatSession::new();
        session.settle(Ok("late".to_string()));
        assert_eq!(session.outstanding(), 0);
        assert_eq!(session.messages().len(), 1);
    }
}
