//! Text buffer and inline formatting toggles

/// Contents of the text box: value plus selection.
///
/// Selection offsets count chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    value: String,
    selection_start: usize,
    selection_end: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `value` with the caret at the end
    pub fn with_value(value: impl Into<String>) -> Self {
        let mut buffer = Self::new();
        buffer.set_value(value);
        buffer
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Replace the contents; the caret moves to the end
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        let end = self.len();
        self.selection_start = end;
        self.selection_end = end;
    }

    pub fn clear(&mut self) {
        self.set_value(String::new());
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    /// Select `start..end`, clamped to the text
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.len();
        let start = start.min(len);
        self.selection_start = start;
        self.selection_end = end.clamp(start, len);
    }

    /// Wrap the selection in a doubled `marker`, or unwrap it if already
    /// wrapped. Applying it twice to the same selection is a no-op.
    pub fn toggle_format_char(&mut self, marker: char) -> bool {
        let mut text: Vec<char> = self.value.chars().collect();
        let (mut start, mut end) = self.selection();

        // Don't start or end in the middle of an existing pair
        if char_at(&text, start, 0) == Some(marker)
            && char_at(&text, start, 1) == Some(marker)
            && char_at(&text, start, 2) != Some(marker)
        {
            start += 1;
        }
        if char_at(&text, end, 0) == Some(marker)
            && char_at(&text, end, 1) == Some(marker)
            && char_at(&text, end, 2) != Some(marker)
        {
            end -= 1;
        }
        end = end.max(start);

        // Wrap
        let wrap = [marker; 2];
        text.splice(end..end, wrap);
        text.splice(start..start, wrap);
        start += 2;
        end += 2;

        // Collapse a pair sitting right next to another pair
        let nesting = [marker; 4];
        if window(&text, start.checked_sub(4)) == Some(&nesting[..]) {
            text.drain(start - 4..start);
            start -= 4;
            end -= 4;
        } else if start != end && window(&text, start.checked_sub(2)) == Some(&nesting[..]) {
            text.drain(start - 2..start + 2);
            start -= 2;
            // A lone marker selected at the start leaves nothing between the pairs
            end = end.saturating_sub(4).max(start);
        }
        if window(&text, Some(end)) == Some(&nesting[..]) {
            text.drain(end..end + 4);
        } else if start != end && window(&text, end.checked_sub(2)) == Some(&nesting[..]) {
            text.drain(end - 2..end + 2);
            end = end.saturating_sub(2).max(start);
        }

        self.value = text.into_iter().collect();
        self.set_selection(start, end);
        true
    }
}

/// Char `back` positions before `index`, if in range
fn char_at(text: &[char], index: usize, back: usize) -> Option<char> {
    index
        .checked_sub(back)
        .and_then(|i| text.get(i))
        .copied()
}

/// Four chars starting at `from`, if all in range
fn window(text: &[char], from: Option<usize>) -> Option<&[char]> {
    let from = from?;
    text.get(from..from + 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(value: &str, start: usize, end: usize, marker: char) -> (String, (usize, usize)) {
        let mut buffer = TextBuffer::with_value(value);
        buffer.set_selection(start, end);
        buffer.toggle_format_char(marker);
        (buffer.value().to_string(), buffer.selection())
    }

    #[test]
    fn test_wrap_selection() {
        assert_eq!(toggle("hello", 0, 5, '*'), ("**hello**".into(), (2, 7)));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut buffer = TextBuffer::with_value("hello");
        buffer.set_selection(0, 5);

        buffer.toggle_format_char('*');
        assert_eq!(buffer.value(), "**hello**");
        assert_eq!(buffer.selection(), (2, 7));

        buffer.toggle_format_char('*');
        assert_eq!(buffer.value(), "hello");
        assert_eq!(buffer.selection(), (0, 5));
    }

    #[test]
    fn test_wrap_inside_sentence() {
        assert_eq!(
            toggle("say hello now", 4, 9, '_'),
            ("say __hello__ now".into(), (6, 11))
        );
        assert_eq!(
            toggle("say __hello__ now", 6, 11, '_'),
            ("say hello now".into(), (4, 9))
        );
    }

    #[test]
    fn test_unwrap_when_markers_are_selected() {
        // Selection covers the markers themselves
        assert_eq!(toggle("**hello**", 0, 9, '*'), ("hello".into(), (0, 5)));
    }

    #[test]
    fn test_caret_toggle_is_idempotent() {
        let (value, (start, end)) = toggle("abc", 3, 3, '`');
        assert_eq!(value, "abc````");
        assert_eq!((start, end), (5, 5));

        assert_eq!(toggle(&value, start, end, '`'), ("abc".into(), (3, 3)));
    }

    #[test]
    fn test_boundaries_inside_marker_pairs_are_nudged() {
        // Selection starts and ends between the two markers of each pair
        assert_eq!(toggle("**hello**", 1, 8, '*'), ("hello".into(), (0, 5)));
    }

    #[test]
    fn test_lone_marker_at_start() {
        assert_eq!(toggle("*", 0, 1, '*'), ("*".into(), (0, 0)));
        assert_eq!(toggle("*abc", 0, 1, '*'), ("*abc".into(), (0, 0)));
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(toggle("héllo wörld", 6, 11, '*'), ("héllo **wörld**".into(), (8, 13)));
    }

    #[test]
    fn test_set_selection_clamps() {
        let mut buffer = TextBuffer::with_value("abc");
        buffer.set_selection(5, 1);
        assert_eq!(buffer.selection(), (3, 3));

        buffer.set_selection(2, 1);
        assert_eq!(buffer.selection(), (2, 2));
    }
}
