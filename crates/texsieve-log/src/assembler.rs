use crate::ir::{Diagnostic, DiagnosticKind, LineSpan, Location};
use crate::window::line_width;

/// A diagnostic whose text is still arriving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collecting {
    pub kind: DiagnosticKind,
    pub buffer: String,
    pub location: Option<Location>,
    pub first_line: usize,
    pub last_line: usize,
}

impl Collecting {
    fn into_diagnostic(self) -> Diagnostic {
        Diagnostic {
            kind: self.kind,
            message: self.buffer,
            location: self.location,
            lines: LineSpan::new(self.first_line, self.last_line),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParserState {
    #[default]
    Idle,
    Collecting(Collecting),
}

/// Joins wrapped physical lines back into one message.
///
/// Every line that reaches the wrap width is assumed to continue on the next
/// one; the first strictly shorter line completes the message.
#[derive(Debug, Clone)]
pub struct Assembler {
    state: ParserState,
    wrap_width: usize,
}

impl Assembler {
    pub fn new(wrap_width: usize) -> Self {
        Self {
            state: ParserState::Idle,
            wrap_width,
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, ParserState::Collecting(_))
    }

    /// Starts a new message with the text already known from earlier lines.
    pub fn begin(
        &mut self,
        kind: DiagnosticKind,
        seed: &str,
        location: Option<Location>,
        first_line: usize,
    ) {
        if let ParserState::Collecting(previous) = &self.state {
            log::warn!(
                "Discarding unfinished {} started on line {}",
                previous.kind,
                previous.first_line
            );
        }
        log::debug!("Collecting wrapped {} from line {}", kind, first_line);
        self.state = ParserState::Collecting(Collecting {
            kind,
            buffer: seed.to_string(),
            location,
            first_line,
            last_line: first_line,
        });
    }

    /// Appends a whole physical line. Returns the finished diagnostic when
    /// the line is shorter than the wrap width.
    pub fn feed(&mut self, line: &str, line_no: usize) -> Option<Diagnostic> {
        self.absorb(line, line_width(line), line_no)
    }

    /// Appends `fragment`, judging completion on the width of the physical
    /// line it was taken from.
    pub(crate) fn absorb(
        &mut self,
        fragment: &str,
        physical_width: usize,
        line_no: usize,
    ) -> Option<Diagnostic> {
        let ParserState::Collecting(collecting) = &mut self.state else {
            return None;
        };
        collecting.buffer.push_str(fragment);
        collecting.last_line = line_no;
        if physical_width < self.wrap_width {
            return self.flush();
        }
        None
    }

    /// Ends collection, returning whatever was gathered so far.
    pub fn flush(&mut self) -> Option<Diagnostic> {
        match std::mem::take(&mut self.state) {
            ParserState::Idle => None,
            ParserState::Collecting(collecting) => Some(collecting.into_diagnostic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_until_short_line() {
        let mut assembler = Assembler::new(5);
        assembler.begin(DiagnosticKind::Warning, "", None, 1);
        assert!(assembler.feed("abcde", 1).is_none());
        assert!(assembler.feed("fghij", 2).is_none());
        let diagnostic = assembler.feed("kl", 3).unwrap();
        assert_eq!(diagnostic.message, "abcdefghijkl");
        assert_eq!(diagnostic.lines, LineSpan::new(1, 3));
        assert!(!assembler.is_collecting());
    }

    #[test]
    fn test_feed_while_idle_is_ignored() {
        let mut assembler = Assembler::new(79);
        assert!(assembler.feed("short", 1).is_none());
        assert_eq!(assembler.state(), &ParserState::Idle);
    }

    #[test]
    fn test_flush_partial() {
        let mut assembler = Assembler::new(3);
        assembler.begin(DiagnosticKind::Error, "ab", None, 4);
        assert!(assembler.feed("cde", 5).is_none());
        let diagnostic = assembler.flush().unwrap();
        assert_eq!(diagnostic.message, "abcde");
        assert_eq!(diagnostic.kind, DiagnosticKind::Error);
        assert!(assembler.flush().is_none());
    }

    #[test]
    fn test_empty_line_completes() {
        let mut assembler = Assembler::new(3);
        assembler.begin(DiagnosticKind::Warning, "abc", None, 1);
        let diagnostic = assembler.feed("", 2).unwrap();
        assert_eq!(diagnostic.message, "abc");
    }
}
