//! Text entry for a chat room: history browsing and formatting shortcuts.
//!
//! The widget layer owns the actual text box and mirrors it into the
//! entry's [`TextBuffer`]; submitted lines go to a caller-supplied closure,
//! normally [`crate::ChatRoom::send`].

mod format;
mod history;
mod keys;

pub use format::TextBuffer;
pub use history::{HISTORY_CAPACITY, HISTORY_PRUNE, InputHistory};
pub use keys::{FormatMarker, Key, KeyEvent, Modifiers};

#[derive(Debug, Clone, Default)]
pub struct ChatTextEntry {
    buffer: TextBuffer,
    history: InputHistory,
}

impl ChatTextEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// For the widget layer to mirror typing and selection changes
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn history(&self) -> &InputHistory {
        &self.history
    }

    pub fn value(&self) -> &str {
        self.buffer.value()
    }

    /// Deliver the current line, remember it and clear the box
    pub fn submit<F>(&mut self, on_message: F) -> bool
    where
        F: FnOnce(&str),
    {
        on_message(self.buffer.value());
        self.history.push(self.buffer.value());
        self.buffer.clear();
        true
    }

    pub fn history_up(&mut self) -> bool {
        match self.history.previous(self.buffer.value()) {
            Some(line) => {
                self.buffer.set_value(line);
                true
            }
            None => false,
        }
    }

    pub fn history_down(&mut self) -> bool {
        match self.history.next(self.buffer.value()) {
            Some(line) => {
                self.buffer.set_value(line);
                true
            }
            None => false,
        }
    }

    pub fn toggle_format(&mut self, marker: FormatMarker) -> bool {
        self.buffer.toggle_format_char(marker.as_char())
    }

    /// The entry's own key bindings; true if the key was consumed
    pub fn handle_key<F>(&mut self, event: &KeyEvent, on_message: F) -> bool
    where
        F: FnOnce(&str),
    {
        let shift = event.modifiers.shift;
        let alt = event.modifiers.alt;

        match event.key {
            Key::Enter if !shift => self.submit(on_message),
            Key::Char(c) if event.is_command() => match FormatMarker::for_key(c) {
                Some(marker) => self.toggle_format(marker),
                None => false,
            },
            Key::Up if !shift && !alt => self.history_up(),
            Key::Down if !shift && !alt => self.history_down(),
            _ => false,
        }
    }

    /// Full key-down handling: our bindings first, then `on_key`.
    ///
    /// Returns true if the event was consumed and default text editing must
    /// not happen.
    pub fn key_down<F, K>(&mut self, event: &KeyEvent, on_message: F, on_key: K) -> bool
    where
        F: FnOnce(&str),
        K: FnOnce(&KeyEvent) -> bool,
    {
        self.handle_key(event, on_message) || on_key(event)
    }
}
