use rocks_lang::interpreter::Interpreter;
use rocks_lang::object::Value;
use rocks_lang::parser::Parser;
use rocks_lang::resolver::Resolver;
use rocks_lang::scanner::Scanner;
use rocks_lang::token::Token;

/// Scans, parses, resolves, and interprets `source` against a fresh
/// interpreter, returning it so a test can inspect the resulting globals.
#[allow(dead_code)]
pub fn run(source: &str) -> Interpreter {
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens();
    let mut parser = Parser::new(tokens);
    let statements = parser.parse();
    let mut interpreter = Interpreter::new();
    let mut resolver = Resolver::new(&mut interpreter);
    resolver.resolve(&statements);
    interpreter.interpret(&statements);
    interpreter
}

#[allow(dead_code)]
pub fn global(interpreter: &Interpreter, name: &str) -> Value {
    interpreter
        .globals
        .borrow()
        .get(&Token::from(name))
        .unwrap_or_else(|err| panic!("expected global '{name}' to exist: {}", err.message))
}
