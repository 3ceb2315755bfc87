//! Injected capabilities through which the pipeline talks to its host.
//!
//! An [`ErrorSink`] receives every diagnostic (lexical, syntax, resolution
//! and runtime) and remembers what happened; an [`OutputSink`] receives one
//! line per executed `print`.  Both are owned by the caller of
//! [`lox::run`](crate::lox::run), so no state survives from one run to the next.

use log::debug;

use crate::error::{LoxError, RuntimeError};
use crate::token::Token;

/// Destination for diagnostics produced by every phase of the pipeline.
pub trait ErrorSink {
    /// Record a single diagnostic.
    fn report(&mut self, error: LoxError);

    /// Everything reported so far, in order.
    fn errors(&self) -> &[LoxError];

    /// Lexical error at `line`.
    fn error(&mut self, line: usize, message: &str) {
        self.report(LoxError::lex(line, message));
    }

    /// Syntax error located at `token`.
    fn error_at(&mut self, token: &Token, message: &str) {
        self.report(LoxError::parse(token, message));
    }

    fn runtime_error(&mut self, error: RuntimeError) {
        self.report(LoxError::Runtime(error));
    }

    /// Did any lexical, syntax or resolution error occur?
    fn had_error(&self) -> bool {
        self.errors().iter().any(|e| !e.is_runtime())
    }

    fn had_runtime_error(&self) -> bool {
        self.errors().iter().any(LoxError::is_runtime)
    }

    /// Rendered form of every diagnostic.
    fn messages(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }
}

/// Per‑run collecting [`ErrorSink`].
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorSink for Diagnostics {
    fn report(&mut self, error: LoxError) {
        debug!("Diagnostic reported: {}", error);

        self.errors.push(error);
    }

    fn errors(&self) -> &[LoxError] {
        &self.errors
    }
}

/// Receives the stringified value of every executed `print` statement.
pub trait OutputSink {
    fn print(&mut self, line: &str);
}

/// Writes program output straight to stdout.
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl OutputSink for StdoutOutput {
    fn print(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Records program output in memory.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    lines: Vec<String>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl OutputSink for CapturedOutput {
    fn print(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}
