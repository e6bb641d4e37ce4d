//! Cursor state and a minimal single-line text editor.
//!
//! [`CursorState`] is an insertion index measured in characters. Every
//! transition clamps, so the index never leaves `0..=len(text)`.
//! [`TextEditor`] owns the text together with its cursor and applies
//! discrete [`EditEvent`]s; hosts feed it keyboard input synchronously.

/// Insertion point, in characters, into the current text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorState {
    index: usize,
}

impl CursorState {
    /// Cursor at the start of the text.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn move_left(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn move_right(&mut self, text_len: usize) {
        self.index = (self.index + 1).min(text_len);
    }

    /// Re-clamp after the text changed to `new_len` characters.
    pub fn on_text_changed(&mut self, new_len: usize) {
        self.index = self.index.min(new_len);
    }

    /// Jump to `index`, clamped to `text_len`.
    pub fn set(&mut self, index: usize, text_len: usize) {
        self.index = index.min(text_len);
    }
}

/// A discrete editing input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditEvent {
    MoveLeft,
    MoveRight,
    Home,
    End,
    /// Insert at the cursor and move past the inserted text.
    Insert(String),
    /// Remove the character before the cursor.
    Backspace,
    /// Remove the character after the cursor.
    Delete,
    /// Replace the whole text; the cursor is clamped, not reset.
    Replace(String),
}

/// Single-line text plus its cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextEditor {
    text: String,
    len: usize,
    cursor: CursorState,
}

impl TextEditor {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            len,
            cursor: CursorState::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    /// Apply `event`. Returns `true` when the text itself changed.
    pub fn apply(&mut self, event: EditEvent) -> bool {
        match event {
            EditEvent::MoveLeft => {
                self.cursor.move_left();
                false
            }
            EditEvent::MoveRight => {
                self.cursor.move_right(self.len);
                false
            }
            EditEvent::Home => {
                self.cursor.set(0, self.len);
                false
            }
            EditEvent::End => {
                self.cursor.set(self.len, self.len);
                false
            }
            EditEvent::Insert(s) => {
                let inserted = s.chars().count();
                if inserted == 0 {
                    return false;
                }
                let at = self.byte_offset(self.cursor.index());
                self.text.insert_str(at, &s);
                self.len += inserted;
                self.cursor.set(self.cursor.index() + inserted, self.len);
                true
            }
            EditEvent::Backspace => {
                let index = self.cursor.index();
                if index == 0 {
                    return false;
                }
                self.remove_char(index - 1);
                self.cursor.move_left();
                true
            }
            EditEvent::Delete => {
                let index = self.cursor.index();
                if index >= self.len {
                    return false;
                }
                self.remove_char(index);
                true
            }
            EditEvent::Replace(text) => {
                let changed = text != self.text;
                self.len = text.chars().count();
                self.text = text;
                self.cursor.on_text_changed(self.len);
                changed
            }
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn remove_char(&mut self, char_index: usize) {
        let at = self.byte_offset(char_index);
        if at < self.text.len() {
            self.text.remove(at);
            self.len -= 1;
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
