use crate::config::ParserConfig;
use crate::emitter::DiagnosticSink;
use crate::ir::Diagnostic;
use crate::parser::LogParser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a piece of text produced around a compiler run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputChannel {
    Stdout,
    Stderr,
    /// Messages from the host running the process (e.g. "Process finished
    /// with exit code 1"), not from the compiler itself.
    System,
}

impl OutputChannel {
    pub fn is_process_output(self) -> bool {
        matches!(self, OutputChannel::Stdout | OutputChannel::Stderr)
    }
}

/// Adapter between a process runner and the parser.
///
/// Receives text events as the runner reports them, drops everything that
/// is not compiler output, and splits the rest into physical lines.
#[derive(Debug)]
pub struct ProcessOutputListener<S = Vec<Diagnostic>> {
    parser: LogParser<S>,
}

impl ProcessOutputListener {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(ParserConfig::default()), Vec::new())
    }
}

impl Default for ProcessOutputListener {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagnosticSink> ProcessOutputListener<S> {
    pub fn with_sink(config: Arc<ParserConfig>, sink: S) -> Self {
        Self {
            parser: LogParser::with_sink(config, sink),
        }
    }

    pub fn parser(&self) -> &LogParser<S> {
        &self.parser
    }

    /// Handles one text event. The runner is expected to deliver whole
    /// lines; a terminator at the end is optional.
    pub fn on_text_available(&mut self, text: &str, channel: OutputChannel) {
        if !channel.is_process_output() {
            log::trace!("Ignoring {:?} text: {:?}", channel, text);
            return;
        }
        let text = text.strip_suffix('\n').unwrap_or(text);
        for line in text.split('\n') {
            self.parser.push_line(line);
        }
    }

    /// The process is gone. Depending on [`ParserConfig::flush_on_end`], an
    /// unfinished diagnostic is either emitted or dropped.
    pub fn process_terminated(self) -> S {
        if self.parser.config().flush_on_end() {
            self.parser.finish()
        } else {
            self.parser.into_sink()
        }
    }
}
