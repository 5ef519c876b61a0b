use std::collections::VecDeque;

const CAPACITY: usize = 2;

/// Width of a physical line as counted against the wrap width.
pub fn line_width(line: &str) -> usize {
    line.chars().count()
}

/// The two most recent physical lines.
///
/// Patterns such as `file:line: message` may be split by the engine's line
/// wrapping, so detection looks at both lines joined together.
#[derive(Debug, Default, Clone)]
pub struct Window {
    lines: VecDeque<String>,
}

impl Window {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(CAPACITY),
        }
    }

    /// Appends `line`, evicting the oldest one when full.
    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// The held lines joined in order, without separator.
    pub fn text(&self) -> String {
        self.lines.iter().map(String::as_str).collect()
    }

    pub fn is_oldest_empty(&self) -> bool {
        self.lines.front().is_some_and(|line| line.is_empty())
    }

    pub fn oldest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn newest(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lines.len() == CAPACITY
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
