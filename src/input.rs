/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text being composed, with a cursor counted in characters
#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let char_count = self.text.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Take the composed text and leave the buffer empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputBuffer {
        let mut buf = InputBuffer::default();
        for c in s.chars() {
            buf.insert(c);
        }
        buf
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut buf = typed("hllo");
        buf.home();
        buf.move_right();
        buf.insert('e');
        assert_eq!(buf.as_str(), "hello");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buf = typed("héllo");
        buf.move_left();
        buf.move_left();
        buf.move_left();
        buf.backspace();
        assert_eq!(buf.as_str(), "hllo");
        buf.delete();
        assert_eq!(buf.as_str(), "hlo");
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut buf = typed("ab");
        buf.move_right();
        buf.move_right();
        assert_eq!(buf.cursor(), 2);
        buf.home();
        buf.move_left();
        assert_eq!(buf.cursor(), 0);
        buf.backspace();
        assert_eq!(buf.as_str(), "ab");
    }

    #[test]
    fn test_take_resets() {
        let mut buf = typed("  hello ");
        assert!(!buf.is_blank());
        assert_eq!(buf.take(), "  hello ");
        assert_eq!(buf.as_str(), "");
        assert_eq!(buf.cursor(), 0);
        assert!(buf.is_blank());
    }
}
