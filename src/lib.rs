#![allow(clippy::needless_return)]

//! Rocks is a programming language written in Rust. It is a dynamically typed, class-based
//! language with lexical scoping and first-class functions, evaluated by a tree-walk interpreter
//! over a hand-written recursive descent parser.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a string of
//! characters into a list of tokens. The scanner is implemented in the [`scanner`](scanner) module
//! as an iterator over the characters in the source code, with two tokens of lookahead (needed to
//! disambiguate a range literal's `..`/`..=` from a decimal point). The scanner reports syntax
//! errors as a [`ScanError`](error::ScanError) and keeps scanning past one, so the user can see
//! every problem in a file instead of only the first.
//!
//! ## Parsing
//! The second step is parsing: converting the token list into an abstract syntax tree. The parser
//! is implemented in the [`parser`](parser) module as a recursive descent parser producing
//! [`Expr`](expr::Expr) and [`Stmt`](stmt::Stmt) nodes. The parser reports syntax errors as a
//! [`ParseError`](error::ParseError) and recovers from one by synchronizing at the next likely
//! statement boundary, for the same reason the scanner keeps going.
//!
//! ## Resolving
//! The third step is resolving: a static pass over the AST that binds every local variable
//! reference to a scope distance, so the interpreter doesn't have to walk the environment chain by
//! name at every lookup. The resolver is implemented in the [`resolver`](resolver) module and
//! reports semantic errors (a variable used in its own initializer, `return` outside a function, a
//! class inheriting from itself) as a [`ResolveError`](error::ResolveError).
//!
//! ## Interpreting
//! The final step is interpreting: walking the resolved AST and evaluating it. The interpreter is
//! implemented in the [`interpreter`](interpreter) module. It reports errors it can only discover
//! at runtime — a type error, an undefined property, division by zero — as a
//! [`RuntimeError`](error::RuntimeError).

use std::io::Write;
use std::path::PathBuf;
use std::{fs, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The history file lives under the user's home directory so the REPL
/// remembers previous sessions, the same way a shell does.
fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".rocks_history"))
}

/// Owns an [`Interpreter`] across however many source strings it is asked to
/// run, so that top-level declarations persist between a script's statements
/// and, in the REPL, between one entered line and the next.
pub struct Rocks {
    interpreter: Interpreter,
}

impl Rocks {
    pub fn new() -> Self {
        Rocks { interpreter: Interpreter::new() }
    }

    /// Runs a script file to completion and exits the process with a status
    /// code reflecting what happened: `0` on success, `65` on a syntax or
    /// resolution error, `70` on a runtime error.
    pub fn run_file(&mut self, path: &str) {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                eprintln!("Could not read file '{path}': {err}");
                process::exit(66);
            }
        };

        self.run(&contents, false);

        if error::did_error() {
            process::exit(65);
        }
        if error::did_runtime_error() {
            process::exit(70);
        }
    }

    /// Runs an interactive read-eval-print loop with line editing and
    /// persistent history. A line that errors only taints that line: the
    /// session keeps going and the next line starts with a clean slate.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new().expect("readline editor to initialize");
        let history = history_path();
        if let Some(history) = &history {
            let _ = editor.load_history(history);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line, true);
                    error::reset_error();
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Readline error: {err}");
                    break;
                }
            }
        }

        if let Some(history) = &history {
            let _ = editor.save_history(history);
        }
    }

    fn run(&mut self, source: &str, is_repl: bool) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        if error::did_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        if error::did_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if error::did_error() {
            return;
        }

        if is_repl {
            self.interpreter.interpret_repl(&statements);
        } else {
            self.interpreter.interpret(&statements);
        }
        std::io::stdout().flush().ok();
    }
}

impl Default for Rocks {
    fn default() -> Self {
        Self::new()
    }
}
