use crate::assembler::Assembler;
use crate::config::ParserConfig;
use crate::detector::{Detection, Detector};
use crate::emitter::{DiagnosticSink, Emitter};
use crate::ir::{Diagnostic, LineSpan};
use crate::window::{Window, line_width};
use std::sync::Arc;

/// A streaming classifier for TeX compiler output.
///
/// `LogParser` consumes physical lines (or arbitrary chunks, see
/// [`update`](Self::update)) in arrival order and delivers every error or
/// warning it recognizes to its sink once the full, unwrapped message is
/// known.
///
/// A line that reaches the wrap width is assumed to continue on the next
/// line. Such a line is *deferred*: it is only evaluated once its successor
/// has arrived, so a pattern split across the boundary is still recognized.
#[derive(Debug)]
pub struct LogParser<S = Vec<Diagnostic>> {
    config: Arc<ParserConfig>,
    window: Window,
    detector: Detector,
    assembler: Assembler,
    emitter: Emitter<S>,
    /// Whether the newest line in the window still has to be evaluated as
    /// the start of a diagnostic.
    deferred: bool,
    line_no: usize,
    partial: String,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    /// Creates a parser with the default TeX configuration, collecting into a `Vec`.
    pub fn new() -> Self {
        Self::with_config(Arc::new(ParserConfig::default()))
    }

    pub fn with_config(config: Arc<ParserConfig>) -> Self {
        Self::with_sink(config, Vec::new())
    }

    /// Takes the diagnostics emitted since the previous call.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(self.emitter.sink_mut())
    }

    /// Appends `input` and returns the diagnostics it completed.
    pub fn update_drain(&mut self, input: &str) -> Vec<Diagnostic> {
        self.update(input);
        self.drain()
    }

    /// Parses a complete log at once, flushing anything left at the end.
    pub fn parse(mut self, input: &str) -> Vec<Diagnostic> {
        self.update(input);
        self.finish()
    }
}

impl<S: DiagnosticSink> LogParser<S> {
    pub fn with_sink(config: Arc<ParserConfig>, sink: S) -> Self {
        Self {
            window: Window::new(),
            detector: Detector::new(Arc::clone(&config)),
            assembler: Assembler::new(config.wrap_width()),
            emitter: Emitter::new(sink),
            deferred: false,
            line_no: 0,
            partial: String::new(),
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn is_collecting(&self) -> bool {
        self.assembler.is_collecting()
    }

    /// Number of diagnostics delivered to the sink so far.
    pub fn emitted(&self) -> usize {
        self.emitter.emitted()
    }

    /// Number of physical lines consumed so far.
    pub fn lines_seen(&self) -> usize {
        self.line_no
    }

    pub fn sink(&self) -> &S {
        self.emitter.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.emitter.sink_mut()
    }

    /// Appends a chunk of raw output. Complete lines are processed right
    /// away; a trailing partial line waits for its terminator.
    pub fn update(&mut self, input: &str) {
        self.partial.push_str(input);
        let Some(last_nl) = self.partial.rfind('\n') else {
            return;
        };
        let rest = self.partial.split_off(last_nl + 1);
        let complete = std::mem::replace(&mut self.partial, rest);
        for line in complete.lines() {
            self.push_line(line);
        }
    }

    /// Processes one physical line. Trailing `\r`/`\n` are ignored.
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim_end_matches(['\n', '\r']);
        self.line_no += 1;
        self.window.push(line);

        if self.assembler.is_collecting() {
            if let Some(diagnostic) = self.assembler.feed(line, self.line_no) {
                self.emitter.emit(diagnostic);
            }
            return;
        }

        let deferred = std::mem::take(&mut self.deferred);

        if self.window.is_oldest_empty() {
            log::trace!("Blank boundary before line {}, deferring", self.line_no);
            self.deferred = true;
            return;
        }

        if deferred && self.window.is_full() && self.resolve_previous(line) {
            return;
        }

        self.evaluate_current(line);
    }

    /// Ends the stream: processes a buffered partial line, then flushes an
    /// unfinished diagnostic or a deferred line. Returns the sink.
    pub fn finish(mut self) -> S {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push_line(&line);
        }
        if let Some(diagnostic) = self.assembler.flush() {
            log::warn!(
                "Log ended while collecting a wrapped {} from line {}, emitting it as is",
                diagnostic.kind,
                diagnostic.lines.first
            );
            self.emitter.emit(diagnostic);
        } else if std::mem::take(&mut self.deferred) {
            let line = self.window.newest().unwrap_or_default().to_string();
            self.emit_standalone(&line);
        }
        self.emitter.into_sink()
    }

    /// Ends the stream without flushing. A message still being collected,
    /// or a deferred line, is dropped.
    pub fn into_sink(self) -> S {
        if self.assembler.is_collecting() || self.deferred || !self.partial.is_empty() {
            log::debug!("Dropping unfinished output after line {}", self.line_no);
        }
        self.emitter.into_sink()
    }

    /// Evaluates the deferred previous line as the start of a diagnostic.
    ///
    /// Returns `true` when it matched, in which case the current line has
    /// been consumed or deferred in turn.
    fn resolve_previous(&mut self, line: &str) -> bool {
        let Some(previous) = self.window.oldest() else {
            return false;
        };
        let previous_no = self.line_no - 1;

        if line_width(previous) < self.config.wrap_width() {
            // Only deferred because of a blank boundary; it cannot wrap.
            let previous = previous.to_string();
            let Some(detection) = self.detector.detect(&previous) else {
                return false;
            };
            self.emit_detection(&previous, detection, LineSpan::single(previous_no));
            self.deferred = true;
            return true;
        }

        let text = self.window.text();
        let head_len = previous.len();
        let Some(detection) = self.detector.detect(&text) else {
            return false;
        };
        let seed_start = detection.message_start.min(head_len);
        let tail_start = detection.message_start.max(head_len);
        self.assembler.begin(
            detection.kind,
            &text[seed_start..head_len],
            detection.location,
            previous_no,
        );
        if let Some(diagnostic) =
            self.assembler
                .absorb(&text[tail_start..], line_width(line), self.line_no)
        {
            self.emitter.emit(diagnostic);
        }
        true
    }

    /// Evaluates the current line as the start of a diagnostic.
    fn evaluate_current(&mut self, line: &str) {
        if line_width(line) >= self.config.wrap_width() {
            self.deferred = true;
            return;
        }
        self.emit_standalone(line);
    }

    fn emit_standalone(&mut self, line: &str) {
        if let Some(detection) = self.detector.detect(line) {
            self.emit_detection(line, detection, LineSpan::single(self.line_no));
        }
    }

    fn emit_detection(&mut self, text: &str, detection: Detection, lines: LineSpan) {
        self.emitter.emit(Diagnostic {
            kind: detection.kind,
            message: text[detection.message_start..].to_string(),
            location: detection.location,
            lines,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_chunks() {
        let input = "\
This is pdfTeX, Version 3.141592653-2.6-1.40.25 (TeX Live 2023)
./main.tex:12: Undefined control sequence.
LaTeX Warning: Reference `missing' on page 1 undefined on input line 6.

Output written on main.pdf (1 page, 12345 bytes).
";
        // Baseline
        let expected = LogParser::new().parse(input);
        assert_eq!(expected.len(), 2);

        // Chunk size 2 to force many boundaries
        let mut stream_parser = LogParser::new();
        let mut amassed = Vec::new();
        for chunk in input.as_bytes().chunks(2) {
            let s = std::str::from_utf8(chunk).unwrap();
            amassed.extend(stream_parser.update_drain(s));
        }
        amassed.extend(stream_parser.finish());

        assert_eq!(expected, amassed);
    }

    #[test]
    fn test_crlf_stripped() {
        let diagnostics = LogParser::new().parse("main.tex:3: Missing $ inserted.\r\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Missing $ inserted.");
    }

    #[test]
    fn test_partial_line_waits_for_terminator() {
        let mut parser = LogParser::new();
        assert!(parser.update_drain("main.tex:3: Miss").is_empty());
        assert_eq!(parser.lines_seen(), 0);
        let diagnostics = parser.update_drain("ing $ inserted.\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Missing $ inserted.");
    }
}
