use crate::token::{Location, Token, Type};

static mut HAD_ERROR: bool = false;
static mut HAD_RUNTIME_ERROR: bool = false;

/// Checks if a syntax or resolution error occurred.
pub fn did_error() -> bool {
    unsafe { HAD_ERROR }
}

/// Checks if a runtime error occurred.
pub fn did_runtime_error() -> bool {
    unsafe { HAD_RUNTIME_ERROR }
}

/// Resets both error flags. Used by the REPL so one bad line doesn't taint the rest of the session.
pub fn reset_error() {
    unsafe {
        HAD_ERROR = false;
        HAD_RUNTIME_ERROR = false;
    }
}

/// Every diagnostic kind implements this; `throw` prints it and latches the matching flag.
pub trait Error {
    fn throw(&self);
}

#[derive(Debug)]
pub struct ScanError {
    pub location: Location,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        eprintln!("[Line {}] Error: {}", self.location.line, self.message);
        unsafe {
            HAD_ERROR = true;
        }
    }
}

#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        if self.token.r#type == Type::EOF {
            eprintln!(
                "[Line {}] Error at the end: {}",
                self.token.location.line, self.message
            );
        } else {
            eprintln!(
                "[Line {}] Error at '{}': {}",
                self.token.location.line, self.token.lexeme, self.message
            );
        }
        unsafe {
            HAD_ERROR = true;
        }
    }
}

#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        eprintln!(
            "[Line {}] Error at '{}': {}",
            self.token.location.line, self.token.lexeme, self.message
        );
        unsafe {
            HAD_ERROR = true;
        }
    }
}

#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        eprintln!(
            "[Line {}] at '{}': {}",
            self.token.location.line, self.token.lexeme, self.message
        );
        unsafe {
            HAD_RUNTIME_ERROR = true;
        }
    }
}
