use crate::ir::Diagnostic;
use std::sync::mpsc::Sender;

/// Receives finished diagnostics in emission order.
///
/// Implementations must accept synchronously or queue internally; the
/// parser never retries.
pub trait DiagnosticSink {
    fn accept(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn accept(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn accept(&mut self, diagnostic: Diagnostic) {
        (**self).accept(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn accept(&mut self, diagnostic: Diagnostic) {
        (**self).accept(diagnostic);
    }
}

/// Forwards to a display running on another thread.
impl DiagnosticSink for Sender<Diagnostic> {
    fn accept(&mut self, diagnostic: Diagnostic) {
        if let Err(e) = self.send(diagnostic) {
            log::debug!("Diagnostic receiver is gone, dropping: {}", e.0.message);
        }
    }
}

/// Adapts a closure into a [`DiagnosticSink`].
pub struct FnSink<F>(pub F);

impl<F: FnMut(Diagnostic)> DiagnosticSink for FnSink<F> {
    fn accept(&mut self, diagnostic: Diagnostic) {
        (self.0)(diagnostic);
    }
}

/// Hands diagnostics to the sink, one call per finished message.
#[derive(Debug, Default)]
pub struct Emitter<S> {
    sink: S,
    emitted: usize,
}

impl<S: DiagnosticSink> Emitter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, emitted: 0 }
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        log::debug!(
            "Emitting {} from log lines {}-{}",
            diagnostic.kind,
            diagnostic.lines.first,
            diagnostic.lines.last
        );
        self.emitted += 1;
        self.sink.accept(diagnostic);
    }

    /// Total diagnostics delivered so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
