use serde::{Deserialize, Serialize};

/// Classification of a reassembled log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    Error,
    Warning,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Error => f.write_str("error"),
            DiagnosticKind::Warning => f.write_str("warning"),
        }
    }
}

/// 1-based physical log lines that contributed to a diagnostic (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub first: usize,
    pub last: usize,
}

impl LineSpan {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn single(line: usize) -> Self {
        Self::new(line, line)
    }

    /// Number of physical lines covered.
    pub fn line_count(&self) -> usize {
        self.last + 1 - self.first
    }
}

/// Source position as printed by the engine in `file:line: message` errors.
///
/// This is the raw captured text. Nothing is checked against the file system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: u32,
}

/// A finalized, classified log message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub lines: LineSpan,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    pub fn is_warning(&self) -> bool {
        self.kind == DiagnosticKind::Warning
    }
}
