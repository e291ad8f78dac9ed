use crate::message::Message;

/// Append-only, ordered list of messages for the current session.
///
/// Every append bumps `revision`, which the view compares against the last
/// revision it drew to know when to follow the tail.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: Vec<Message>,
    revision: u64,
}

impl ConversationStore {
    /// Add `entry` at the end and return its index
    pub fn append(&mut self, entry: Message) -> usize {
        self.entries.push(entry);
        self.revision += 1;
        self.entries.len() - 1
    }

    pub fn all(&self) -> &[Message] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    #[test]
    fn test_append_preserves_order() {
        let mut store = ConversationStore::default();
        assert_eq!(store.append(Message::user("one")), 0);
        assert_eq!(store.append(Message::system("two")), 1);
        assert_eq!(store.append(Message::user("one")), 2);

        let texts: Vec<&str> = store.all().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["one", "two", "one"]);
        assert_eq!(store.last().map(|m| m.sender()), Some(Sender::User));
    }

    #[test]
    fn test_revision_tracks_appends() {
        let mut store = ConversationStore::default();
        assert!(store.all().is_empty());
        assert_eq!(store.revision(), 0);

        store.append(Message::user("a"));
        store.append(Message::system("b"));
        assert_eq!(store.revision(), 2);
        assert_eq!(store.all().len(), 2);
    }
}
