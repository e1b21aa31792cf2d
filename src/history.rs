/// Previously entered command lines with an up/down cursor.
///
/// The cursor sits one past the newest entry after every push. Moving past
/// either end sticks to the last valid entry instead of wrapping.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    index: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
        self.index = self.entries.len();
    }

    /// Up arrow.
    pub fn previous(&mut self) -> Option<&str> {
        if self.index > 0 && self.index - 1 < self.entries.len() {
            self.index -= 1;
        }
        self.entries.get(self.index).map(String::as_str)
    }

    /// Down arrow.
    pub fn next(&mut self) -> Option<&str> {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
        }
        self.entries.get(self.index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
