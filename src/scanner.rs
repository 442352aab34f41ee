use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Error, ScanError};
use crate::literal::{Literal, Number};
use crate::token::{keyword, Location, Token, Type};

pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column_offset: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
            column_offset: 0,
        }
    }

    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(
            Type::EOF,
            String::from(""),
            None,
            Location::new(self.line, 0),
        ));

        self.tokens.clone()
    }

    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(char) => {
                self.current += 1;
                char
            }
            None => panic!("tried to advance past end of the file."),
        }
    }

    fn peek(&mut self) -> char {
        match self.source.peek() {
            Some(char) => *char,
            None => '\0',
        }
    }

    fn peek_next(&mut self) -> char {
        match self.source.peek_next() {
            Some(char) => *char,
            None => '\0',
        }
    }

    fn match_next(&mut self, expected: char) -> bool {
        match self.source.peek_next() {
            Some(char) if *char == expected => true,
            _ => false,
        }
    }

    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(
            r#type,
            lexeme,
            literal,
            Location::new(self.line, self.start - self.column_offset),
        ));
    }

    fn add_single_char_token(&mut self, r#type: Type) {
        let c = self.advance();
        self.add_token(r#type, c.to_string(), None);
    }

    fn add_double_char_token(&mut self, r#type: Type) {
        let first = self.advance();
        let second = self.advance();
        self.add_token(r#type, format!("{first}{second}"), None);
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn string(&mut self) {
        self.advance(); // opening quote
        let start_location = Location::new(self.line, self.start - self.column_offset);

        let mut value = Vec::new();
        while !self.is_at_end() && self.peek() != '"' {
            if self.peek() == '\n' {
                ScanError {
                    location: Location::new(self.line, self.start - self.column_offset),
                    message: String::from("Unterminated string at newline"),
                }
                .throw();
                return;
            }
            value.push(self.advance());
        }

        if self.is_at_end() {
            ScanError {
                location: start_location,
                message: String::from("Unterminated string at end of file"),
            }
            .throw();
            return;
        }

        self.advance(); // closing quote

        let value: String = value.into_iter().collect();
        self.add_token(Type::String, value.clone(), Some(Literal::String(value)));
    }

    /// Scans a number literal, or a range literal (`a..b`, `a..=b`) when a
    /// second `.` follows the first without an intervening digit.
    fn number(&mut self) {
        let mut value = Vec::new();

        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            value.push(self.advance()); // the dot
            while self.peek().is_ascii_digit() {
                value.push(self.advance());
            }

            let text: String = value.into_iter().collect();
            let number: f64 = text.parse().unwrap_or(0.0);
            self.add_token(Type::Number, text, Some(Literal::Number(Number::Float(number))));
            return;
        }

        if self.peek() == '.' && self.peek_next() == '.' {
            let start_text: String = value.into_iter().collect();
            let start: i64 = start_text.parse().unwrap_or(0);

            self.advance(); // first .
            self.advance(); // second .
            let inclusive = if self.peek() == '=' {
                self.advance();
                true
            } else {
                false
            };

            let mut stop_digits = Vec::new();
            while self.peek().is_ascii_digit() {
                stop_digits.push(self.advance());
            }
            let stop_text: String = stop_digits.into_iter().collect();
            let stop: i64 = stop_text.parse().unwrap_or(0);
            let stop = if inclusive { stop + 1 } else { stop };

            let lexeme = format!(
                "{start_text}..{}{stop_text}",
                if inclusive { "=" } else { "" }
            );
            self.add_token(Type::Range, lexeme, Some(Literal::Range(start, stop)));
            return;
        }

        let text: String = value.into_iter().collect();
        let number: i64 = text.parse().unwrap_or(0);
        self.add_token(Type::Number, text, Some(Literal::Number(Number::Int(number))));
    }

    fn identifier(&mut self) {
        let mut value = Vec::new();

        while matches!(self.peek(), c if c.is_alphanumeric() || c == '_') {
            value.push(self.advance());
        }

        let value = String::from_iter(value);
        let token_type = keyword(&value).unwrap_or(Type::Identifier);
        self.add_token(token_type, value, None);
    }

    fn scan_token(&mut self) {
        let c = self.peek();
        match c {
            '(' => self.add_single_char_token(Type::LeftParen),
            ')' => self.add_single_char_token(Type::RightParen),
            '{' => self.add_single_char_token(Type::LeftBrace),
            '}' => self.add_single_char_token(Type::RightBrace),
            ',' => self.add_single_char_token(Type::Comma),
            ';' => self.add_single_char_token(Type::Semicolon),

            '.' => {
                if self.peek_next().is_ascii_digit() {
                    self.number();
                } else {
                    self.add_single_char_token(Type::Dot);
                }
            }

            '-' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::MinusEqual);
                } else {
                    self.add_single_char_token(Type::Minus);
                }
            }
            '+' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::PlusEqual);
                } else {
                    self.add_single_char_token(Type::Plus);
                }
            }
            '*' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::StarEqual);
                } else {
                    self.add_single_char_token(Type::Star);
                }
            }

            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::BangEqual);
                } else {
                    self.add_single_char_token(Type::Bang);
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::EqualEqual);
                } else if self.match_next('>') {
                    self.add_double_char_token(Type::EqualGreater);
                } else {
                    self.add_single_char_token(Type::Equal);
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::LessEqual);
                } else {
                    self.add_single_char_token(Type::Less);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::GreaterEqual);
                } else {
                    self.add_single_char_token(Type::Greater);
                }
            }
            '/' => {
                if self.match_next('/') {
                    self.advance();
                    self.advance();
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_next('*') {
                    self.advance();
                    self.advance();
                    let start_line = self.line;
                    loop {
                        if self.is_at_end() {
                            ScanError {
                                location: Location::new(start_line, 0),
                                message: String::from("Unterminated multiline comment"),
                            }
                            .throw();
                            break;
                        }
                        if self.peek() == '*' && self.peek_next() == '/' {
                            self.advance();
                            self.advance();
                            break;
                        }
                        if self.peek() == '\n' {
                            self.line += 1;
                            self.column_offset = self.current + 1;
                        }
                        self.advance();
                    }
                } else if self.match_next('=') {
                    self.add_double_char_token(Type::SlashEqual);
                } else {
                    self.add_single_char_token(Type::Slash);
                }
            }

            ' ' | '\r' | '\t' => {
                self.advance();
            }
            '\n' => {
                self.advance();
                self.line += 1;
                self.column_offset = self.current;
            }

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();
                ScanError {
                    location: Location::new(self.line, self.start - self.column_offset),
                    message: format!("Unexpected character '{c}'"),
                }
                .throw();
            }
        }
    }
}
