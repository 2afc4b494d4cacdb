use std::sync::atomic::{AtomicBool, Ordering};

use crate::token::{Location, Token, Type};

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);
static PANICKING: AtomicBool = AtomicBool::new(false);

/// Checks if an error occurred during scanning, parsing, resolution, or interpreting.
pub fn did_error() -> bool {
    HAD_ERROR.load(Ordering::SeqCst) || HAD_RUNTIME_ERROR.load(Ordering::SeqCst)
}

/// Checks if an error occurred during runtime.
pub fn did_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::SeqCst)
}

/// Resets both error flags and the panic-mode flag.
/// Called by the host between REPL lines so a previous error doesn't poison the next one.
pub fn reset_error() {
    HAD_ERROR.store(false, Ordering::SeqCst);
    HAD_RUNTIME_ERROR.store(false, Ordering::SeqCst);
    PANICKING.store(false, Ordering::SeqCst);
}

/// Clears panic mode without touching the "had errors" flags.
/// Called at a synchronization point (e.g. after the parser recovers to the next statement).
pub fn reset_panic() {
    PANICKING.store(false, Ordering::SeqCst);
}

pub fn is_panicking() -> bool {
    PANICKING.load(Ordering::SeqCst)
}

/// Reports a diagnostic at `line`, unless already in panic mode, in which case it is absorbed.
/// Setting the had-errors flag always happens regardless of panic mode.
fn report(line: usize, location: &str, message: &str, runtime: bool) {
    if runtime {
        HAD_RUNTIME_ERROR.store(true, Ordering::SeqCst);
    } else {
        HAD_ERROR.store(true, Ordering::SeqCst);
    }

    if PANICKING.swap(true, Ordering::SeqCst) {
        return;
    }

    eprintln!("[line {line}] Error{location}: {message}");
}

/// Every error kind implements this trait so call sites can write `Error.throw()`
/// uniformly regardless of which pass raised it.
pub trait Error {
    fn throw(&self);
}

/// Raised by the lexer: bad characters, unterminated strings.
#[derive(Debug)]
pub struct ScanError {
    pub location: Location,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        report(self.location.line, "", &self.message, false);
    }
}

/// Raised by the parser on a syntactic violation.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        let location = if self.token.r#type == Type::EOF {
            " at end".to_string()
        } else {
            format!(" at '{}'", self.token.lexeme)
        };

        report(self.token.location.line, &location, &self.message, false);
    }
}

/// Raised by the resolver: redeclaration, bad `return`, self-initialization, bad `this`.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        let location = format!(" at '{}'", self.token.lexeme);
        report(self.token.location.line, &location, &self.message, false);
    }
}

/// Raised by the tree interpreter or the bytecode VM during execution.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        let location = format!(" at '{}'", self.token.lexeme);
        report(self.token.location.line, &location, &self.message, true);
    }
}

/// Reports a VM runtime error that has no token to point at, only a source line.
pub fn runtime_error_at_line(line: usize, message: &str) {
    report(line, "", message, true);
}
