use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    /// Tab/BackTab: move focus to another field.
    Switch,
    Cancel,
}

/// Single-line text entry that only accepts characters passing `accept`
/// and never grows past `max_len` characters.
pub struct TextField {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    max_len: usize,
    accept: fn(char) -> bool,
}

impl TextField {
    pub fn new(max_len: usize, accept: fn(char) -> bool) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            max_len,
            accept,
        }
    }

    /// Letters (accents included) and spaces.
    pub fn name(max_len: usize) -> Self {
        Self::new(max_len, |c| c.is_alphabetic() || c == ' ')
    }

    pub fn digits(max_len: usize) -> Self {
        Self::new(max_len, |c| c.is_ascii_digit())
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                return InputResult::Switch;
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at(self.cursor);
                }
            }
            KeyCode::Delete => self.remove_at(self.cursor),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if (self.accept)(ch) && self.len() < self.max_len {
                    let byte_offset = self.char_to_byte(self.cursor);
                    self.text.insert(byte_offset, ch);
                    self.cursor += 1;
                }
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn remove_at(&mut self, char_idx: usize) {
        let byte_offset = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, s: &str) {
        for ch in s.chars() {
            field.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_name_field_filters_and_caps_length() {
        let mut field = TextField::name(20);
        type_str(&mut field, "Ana María 3!");
        assert_eq!(field.value(), "Ana María ");
        assert_eq!(field.trimmed(), "Ana María");

        let mut long = TextField::name(20);
        type_str(&mut long, &"a".repeat(30));
        assert_eq!(long.value().chars().count(), 20);
    }

    #[test]
    fn test_digit_field() {
        let mut field = TextField::digits(2);
        type_str(&mut field, "a7x89");
        assert_eq!(field.value(), "78");
    }

    #[test]
    fn test_editing_keys() {
        let mut field = TextField::name(20);
        type_str(&mut field, "Lúa");
        field.handle(key(KeyCode::Left));
        field.handle(key(KeyCode::Backspace));
        assert_eq!(field.value(), "La");
        assert_eq!(field.render_parts(), ("L", Some('a'), ""));
        field.handle(key(KeyCode::Home));
        field.handle(key(KeyCode::Delete));
        assert_eq!(field.value(), "a");
        assert_eq!(field.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(field.handle(key(KeyCode::Tab)), InputResult::Switch);
        assert_eq!(field.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }
}
