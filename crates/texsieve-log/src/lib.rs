//! # TeXSieve Log Classifier
//!
//! Streaming classifier for the console output of TeX engines.
//!
//! ## Overview
//!
//! TeX engines (pdfTeX, XeTeX, LuaTeX, etc.) print their terminal output at a
//! fixed width of 79 columns. A single error or warning may therefore be
//! split over several physical lines, and the only hint that a line continues
//! is that it is exactly as long as the wrap width. This crate turns that
//! stream back into discrete [`Diagnostic`](ir::Diagnostic)s:
//!
//! - **Errors** in `-file-line-error` form: `./main.tex:12: Undefined control sequence.`
//! - **Warnings** starting with a known prefix: `LaTeX Warning: `, `Overfull \hbox`, ...
//! - **Wrapped messages**, reassembled without inserted separators
//!
//! ## Architecture
//!
//! ```text
//!  physical line
//!       │
//!       ▼
//! ┌────────────┐   Idle    ┌────────────┐  match  ┌─────────┐
//! │   Window   │ ────────► │  Detector  │ ──────► │ Emitter │ ──► sink
//! │ (2 lines)  │           └────────────┘         └─────────┘
//! └────────────┘                 │ wraps               ▲
//!       │ Collecting             ▼                     │
//!       └──────────────────► ┌───────────┐  short line │
//!                            │ Assembler │ ────────────┘
//!                            └───────────┘
//! ```
//!
//! [`LogParser`](parser::LogParser) owns one of each and must be driven by a
//! single producer, line by line, in arrival order. Settings live in an
//! immutable [`ParserConfig`](config::ParserConfig) shared through `Arc`, so
//! independent runs can be parsed in parallel.
//!
//! ## Examples
//!
//! ### One-shot Parsing
//!
//! ```
//! use texsieve_log::LogParser;
//! use texsieve_log::ir::DiagnosticKind;
//!
//! let output = "\
//! (./main.tex
//! ./main.tex:12: Undefined control sequence.
//! LaTeX Warning: Reference `fig:1' on page 1 undefined on input line 20.
//! ";
//! let diagnostics = LogParser::new().parse(output);
//!
//! assert_eq!(diagnostics.len(), 2);
//! assert_eq!(diagnostics[0].kind, DiagnosticKind::Error);
//! assert_eq!(diagnostics[0].message, "Undefined control sequence.");
//! assert_eq!(diagnostics[1].kind, DiagnosticKind::Warning);
//! ```
//!
//! ### Streaming
//!
//! ```
//! use texsieve_log::LogParser;
//!
//! let mut parser = LogParser::new();
//!
//! // Output arrives in arbitrary chunks
//! let first = parser.update_drain("LaTeX Warning: Label `foo' multiply de");
//! assert!(first.is_empty());
//!
//! let second = parser.update_drain("fined.\n");
//! assert_eq!(second.len(), 1);
//!
//! // Flush whatever is still pending
//! let rest = parser.finish();
//! assert!(rest.is_empty());
//! ```
//!
//! ### Forwarding to a Display Thread
//!
//! ```
//! use std::sync::{mpsc, Arc};
//! use texsieve_log::{LogParser, ParserConfig};
//!
//! let (tx, rx) = mpsc::channel();
//! let mut parser = LogParser::with_sink(Arc::new(ParserConfig::default()), tx);
//! parser.push_line("Underfull \\hbox (badness 10000) in paragraph at lines 3--4");
//! drop(parser.finish());
//!
//! assert_eq!(rx.iter().count(), 1);
//! ```

/// Incremental assembly of wrapped messages.
pub mod assembler;
/// Parser settings and their validation.
pub mod config;
/// Error and warning recognition.
pub mod detector;
/// Delivery of finished diagnostics.
pub mod emitter;
/// Diagnostic types.
pub mod ir;
/// Boundary to a process runner.
pub mod listener;
/// Streaming parser implementation.
pub mod parser;
/// Two-line sliding window.
pub mod window;


pub use config::{ConfigError, ParserConfig};
pub use emitter::{DiagnosticSink, FnSink};
pub use ir::{Diagnostic, DiagnosticKind};
pub use listener::{OutputChannel, ProcessOutputListener};
pub use parser::LogParser;
