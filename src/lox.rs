//! Pipeline driver: source text in, diagnostics and output out.
//!
//! Each entry point takes its sinks from the caller, so two runs never
//! share state.

use log::{debug, info};

use crate::error::Result;
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::sink::{ErrorSink, OutputSink};
use crate::stmt::Stmt;
use crate::token::Token;
use crate::value::Value;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// A lexical, syntax or resolution error; nothing was executed.
    StaticError,
    RuntimeError,
}

impl RunOutcome {
    /// Reads the outcome off whatever the sink collected.
    pub fn from_sink(errors: &dyn ErrorSink) -> Self {
        if errors.had_error() {
            RunOutcome::StaticError
        } else if errors.had_runtime_error() {
            RunOutcome::RuntimeError
        } else {
            RunOutcome::Success
        }
    }

    /// Conventional process exit status (sysexits `EX_DATAERR` / `EX_SOFTWARE`).
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Success => 0,
            RunOutcome::StaticError => 65,
            RunOutcome::RuntimeError => 70,
        }
    }
}

/// Borrows raw file contents as Lox source.
pub fn source_text(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

pub fn tokenize(source: &str, errors: &mut dyn ErrorSink) -> Vec<Token> {
    Scanner::new(source).scan_tokens(errors)
}

/// Scan and parse a whole program.  Statements that failed to parse are
/// left out; the errors are in `errors`.
pub fn parse(source: &str, errors: &mut dyn ErrorSink) -> Vec<Stmt> {
    let tokens = tokenize(source, errors);

    debug!("Scanned {} tokens", tokens.len());

    Parser::new(&tokens, errors).parse()
}

/// Runs `source` as a program.
pub fn run(source: &str, errors: &mut dyn ErrorSink, output: &mut dyn OutputSink) -> RunOutcome {
    info!("Running program ({} bytes)", source.len());

    let statements = parse(source, errors);

    if errors.had_error() {
        info!("Static errors during parsing, not running");
        return RunOutcome::StaticError;
    }

    let locals = Resolver::new(errors).resolve(&statements);

    if errors.had_error() {
        info!("Static errors during resolution, not running");
        return RunOutcome::StaticError;
    }

    debug!("Resolved {} local references", locals.len());

    let mut interpreter = Interpreter::new(locals, output);

    match interpreter.interpret(&statements) {
        Ok(()) => RunOutcome::Success,
        Err(error) => {
            debug!("Runtime error: {}", error);
            errors.runtime_error(error);
            RunOutcome::RuntimeError
        }
    }
}

/// Parses `source` as a single expression and evaluates it.  Returns
/// `None` when any error was reported; [`RunOutcome::from_sink`] tells
/// which kind.
pub fn evaluate(
    source: &str,
    errors: &mut dyn ErrorSink,
    output: &mut dyn OutputSink,
) -> Option<Value> {
    let tokens = tokenize(source, errors);
    let expr: Expr = Parser::new(&tokens, errors).parse_expression()?;

    if errors.had_error() {
        return None;
    }

    let locals = Resolver::new(errors).resolve_expression(&expr);

    if errors.had_error() {
        return None;
    }

    match Interpreter::new(locals, output).evaluate(&expr) {
        Ok(value) => Some(value),
        Err(error) => {
            errors.runtime_error(error);
            None
        }
    }
}
