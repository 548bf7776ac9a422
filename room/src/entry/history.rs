//! Input history of submitted lines

/// Entries kept before the oldest are pruned
pub const HISTORY_CAPACITY: usize = 100;

/// Entries dropped at once when the capacity is exceeded
pub const HISTORY_PRUNE: usize = 20;

/// Most-recently-used list of submitted lines with a browsing cursor.
///
/// `index() == len()` is the live line being typed. Values are unique:
/// pushing a line already present moves it to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputHistory {
    entries: Vec<String>,
    index: usize,
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the cursor is on the live line
    pub fn at_live(&self) -> bool {
        self.index == self.entries.len()
    }

    /// Record a submitted line and move the cursor back to the live line
    pub fn push(&mut self, line: &str) {
        if !line.is_empty() {
            if let Some(duplicate) = self.entries.iter().rposition(|entry| entry == line) {
                self.entries.remove(duplicate);
            }
            self.entries.push(line.to_string());
            if self.entries.len() > HISTORY_CAPACITY {
                self.entries.drain(..HISTORY_PRUNE);
            }
        }
        self.index = self.entries.len();
    }

    /// Step back from `live`, returning the entry to show, or `None` at the
    /// oldest entry. A non-empty `live` line is kept at the cursor first.
    pub fn previous(&mut self, live: &str) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        if !live.is_empty() {
            self.stash(live);
        }
        self.index -= 1;
        self.entries.get(self.index).map(String::as_str)
    }

    /// Step forward from `live`, returning the text to show (empty on
    /// reaching the live line), or `None` if there is nothing to do.
    ///
    /// Pressing down on a non-empty live line keeps it in the history and
    /// clears the box.
    pub fn next(&mut self, live: &str) -> Option<&str> {
        if !live.is_empty() {
            self.stash(live);
        }
        // Only reachable with an empty live line; a non-empty one was just stashed
        if self.at_live() {
            return None;
        }

        self.index += 1;
        if self.at_live() {
            Some("")
        } else {
            self.entries.get(self.index).map(String::as_str)
        }
    }

    /// Keep an edited line at the cursor, appending if on the live line
    fn stash(&mut self, line: &str) {
        match self.entries.get_mut(self.index) {
            Some(entry) => *entry = line.to_string(),
            None => self.entries.push(line.to_string()),
        }
    }
}
