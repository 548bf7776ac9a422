//! Keyboard input as seen by the text entry

/// Keys the text entry cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Up,
    Down,
    PageUp,
    PageDown,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Platform command chord: exactly one of Ctrl/Meta, nothing else
    pub fn is_command(&self) -> bool {
        let m = self.modifiers;
        (m.ctrl != m.meta) && !m.alt && !m.shift
    }
}

/// Inline formatting markers the text entry can toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMarker {
    /// `__italic__`, Ctrl+I
    Emphasis,
    /// `**bold**`, Ctrl+B
    Strong,
    /// ``` ``code`` ```, Ctrl+`
    Monospace,
}

impl FormatMarker {
    pub fn as_char(self) -> char {
        match self {
            FormatMarker::Emphasis => '_',
            FormatMarker::Strong => '*',
            FormatMarker::Monospace => '`',
        }
    }

    /// Marker bound to a letter key pressed with the command chord
    pub fn for_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'i' => Some(FormatMarker::Emphasis),
            'b' => Some(FormatMarker::Strong),
            '`' => Some(FormatMarker::Monospace),
            _ => None,
        }
    }
}
