use crate::config::ParserConfig;
use crate::ir::{DiagnosticKind, Location};
use std::sync::Arc;

/// Outcome of a successful match against a candidate text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub kind: DiagnosticKind,
    /// Byte offset in the matched text where the message begins.
    pub message_start: usize,
    pub location: Option<Location>,
}

/// Recognizes the start of an error or warning.
#[derive(Debug, Clone)]
pub struct Detector {
    config: Arc<ParserConfig>,
}

impl Detector {
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self { config }
    }

    /// Tests `text` against the error pattern, then the warning prefixes.
    pub fn detect(&self, text: &str) -> Option<Detection> {
        self.detect_error(text).or_else(|| self.detect_warning(text))
    }

    fn detect_error(&self, text: &str) -> Option<Detection> {
        let captures = self.config.error_pattern().captures(text)?;
        let message = captures.name("message")?;
        // A line number that overflows u32 is still an error, just without a usable location.
        let location = captures
            .name("line")
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map(|line| Location {
                file: captures.name("file").map(|m| m.as_str().to_string()),
                line,
            });
        Some(Detection {
            kind: DiagnosticKind::Error,
            message_start: message.start(),
            location,
        })
    }

    fn detect_warning(&self, text: &str) -> Option<Detection> {
        self.config
            .warning_prefixes()
            .iter()
            .any(|prefix| text.starts_with(prefix.as_str()))
            .then_some(Detection {
                kind: DiagnosticKind::Warning,
                message_start: 0,
                location: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> Detector {
        Detector::new(Arc::new(ParserConfig::default()))
    }

    #[test]
    fn test_error_with_file() {
        let text = "./main.tex:12: Undefined control sequence.";
        let detection = detector().detect(text).unwrap();
        assert_eq!(detection.kind, DiagnosticKind::Error);
        assert_eq!(&text[detection.message_start..], "Undefined control sequence.");
        assert_eq!(
            detection.location,
            Some(Location {
                file: Some("./main.tex".into()),
                line: 12
            })
        );
    }

    #[test]
    fn test_error_without_file() {
        let text = ":7: Missing $ inserted.";
        let detection = detector().detect(text).unwrap();
        assert_eq!(&text[detection.message_start..], "Missing $ inserted.");
        assert_eq!(detection.location.unwrap().file, None);
    }

    #[test]
    fn test_error_takes_first_line_marker() {
        let text = "chapter.tex:3: Package foo Error: see foo.sty:10: for details";
        let detection = detector().detect(text).unwrap();
        assert_eq!(
            &text[detection.message_start..],
            "Package foo Error: see foo.sty:10: for details"
        );
    }

    #[test]
    fn test_windows_drive_letter_kept_in_file() {
        let text = r"C:\thesis\main.tex:4: Undefined control sequence.";
        let detection = detector().detect(text).unwrap();
        assert_eq!(
            detection.location.unwrap().file.as_deref(),
            Some(r"C:\thesis\main.tex")
        );
    }

    #[test]
    fn test_warning_prefix() {
        let text = "Overfull \\hbox (12.0pt too wide) in paragraph at lines 5--9";
        let detection = detector().detect(text).unwrap();
        assert_eq!(detection.kind, DiagnosticKind::Warning);
        assert_eq!(detection.message_start, 0);
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert!(detector().detect("latex warning: lower case").is_none());
        assert!(detector().detect("  LaTeX Warning: indented").is_none());
    }

    #[test]
    fn test_error_wins_over_warning() {
        let text = "LaTeX Warning: main.tex:3: odd";
        let detection = detector().detect(text).unwrap();
        assert_eq!(detection.kind, DiagnosticKind::Error);
    }

    #[test]
    fn test_chatter_not_detected() {
        assert!(detector().detect("This is pdfTeX, Version 3.141592653").is_none());
        assert!(detector().detect("").is_none());
        assert!(detector().detect("main.tex:12: ").is_none());
    }
}
