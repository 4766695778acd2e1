//! Single-line text input field.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editable single-line text with a character-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
    cursor: usize,
}

impl InputField {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents and move the cursor to the end.
    pub fn set(&mut self, value: &str) {
        *self = Self::new(value);
    }

    pub fn clear(&mut self) {
        self.set("");
    }

    /// Place the cursor at character `position`, clamped to the text.
    pub fn move_to(&mut self, position: usize) {
        self.cursor = position.min(self.len());
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Apply an editing key. Returns `false` when the key is not an edit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.len(),
            KeyCode::Char(_) if ctrl => return false,
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_cursor_movement() {
        let mut field = InputField::new("tesa");
        field.handle_key(key(KeyCode::Left));
        assert!(field.handle_key(key(KeyCode::Char('l'))));
        assert_eq!(field.value(), "tesla");
        assert_eq!(field.cursor(), 4);

        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Delete));
        assert_eq!(field.value(), "esla");

        field.handle_key(key(KeyCode::End));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "esl");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut field = InputField::new("café");
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "caf");
        field.insert('é');
        field.insert('s');
        assert_eq!(field.value(), "cafés");
        assert_eq!(field.cursor(), 5);
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let mut field = InputField::new("something");
        assert!(field.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(field.value(), "");
        assert!(!field.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(!field.handle_key(key(KeyCode::Enter)));
    }

    #[test]
    fn test_edges_do_not_panic() {
        let mut field = InputField::default();
        field.backspace();
        field.delete();
        field.handle_key(key(KeyCode::Left));
        field.move_to(10);
        assert_eq!(field.cursor(), 0);
    }
}
