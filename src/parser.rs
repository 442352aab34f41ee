use crate::error::{Error, ParseError};
use crate::expr::{Expr, Param};
use crate::literal::{Literal, Number};
use crate::stmt::{
    BlockData, ClassData, ExpressionData, ForData, FunctionData, IfData, PrintData, ReturnData,
    Stmt, VarData, WhileData,
};
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, ParseError>;

/// Returns whether the next token is any of the given types, consuming it if so.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) )||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser, one token of lookahead.
///
/// - program     -> declaration* EOF
/// - declaration -> varDecl | classDecl | funcDecl | statement
/// - varDecl     -> "var" IDENT ( "=" expression )? ";"
/// - funcDecl    -> "declare" function
/// - classDecl   -> "class" IDENT ( "<" IDENT )? "{" function* "}"
/// - function    -> IDENT "(" params? ")" block
/// - params      -> param ( "," param )*
/// - param       -> IDENT ( "=" logicOr )?
/// - statement   -> ifStmt | whileStmt | forStmt | forOfStmt | printStmt
///                | returnStmt | block | exprStmt
/// - ifStmt      -> "if" expression block ( "elseif" expression block )* ( "else" statement )?
/// - whileStmt   -> "while" expression block
/// - forStmt     -> "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" block
/// - forOfStmt   -> "for" "(" "var"? IDENT "of" expression ")" block
/// - returnStmt  -> "return" expression? ";"
/// - block       -> "{" declaration* "}"
/// - exprStmt    -> expression ";"
/// - printStmt   -> "print" expression ";"
/// - expression  -> assignment
/// - assignment  -> ( logicOr "." )? IDENT ( "=" | "+=" | "-=" | "*=" | "/=" ) assignment | logicOr
/// - logicOr     -> logicAnd ( "or" logicAnd )*
/// - logicAnd    -> equality ( "and" equality )*
/// - equality    -> comparison ( ( "==" | "!=" ) comparison )*
/// - comparison  -> term ( ( "<" | "<=" | ">" | ">=" ) term )*
/// - term        -> factor ( ( "+" | "-" ) factor )*
/// - factor      -> unary ( ( "*" | "/" ) unary )*
/// - unary       -> ( "+" | "-" | "!" ) unary | call
/// - call        -> primary ( "(" args? ")" | "." IDENT )*
/// - primary     -> NUMBER | STRING | "true" | "false" | "nil" | RANGE
///                | "(" expression ")" | "this" | "super" "." IDENT | IDENT
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::EOF
    }

    fn check(&self, r#type: Type) -> bool {
        !self.is_at_end() && self.peek().r#type == r#type
    }

    fn check_at(&self, offset: usize, r#type: Type) -> bool {
        let index = self.current + offset;
        index < self.tokens.len() && self.tokens[index].r#type == r#type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, r#type: Type, message: &str) -> ParseResult<&Token> {
        if self.check(r#type) {
            return Ok(self.advance());
        }
        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if matches!(self, Type::Class) {
            self.class_declaration()
        } else if matches!(self, Type::Declare) {
            self.function("function")
        } else if matches!(self, Type::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                error.throw();
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name")?.clone();

        let superclass = if matches!(self, Type::Less) {
            self.consume(Type::Identifier, "Expect superclass name")?;
            Some(Expr::variable(self.previous().clone()))
        } else {
            None
        };

        self.consume(Type::LeftBrace, "Expect '{' before class body")?;

        let mut methods: Vec<Stmt> = vec![];
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(Type::RightBrace, "Expect '}' after class body")?;

        Ok(Stmt::Class(ClassData { name, superclass, methods }))
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name")?.clone();

        let initializer = if matches!(self, Type::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(Type::Semicolon, "Expect ';' after variable declaration")?;
        Ok(Stmt::Var(VarData { name, initializer }))
    }

    /// Parses the shared `IDENT "(" params? ")" block` shape used by both
    /// `declare`d functions and class methods.
    fn function(&mut self, kind: &str) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name"))?.clone();
        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name"))?;

        let mut params = Vec::new();
        let mut seen_default = false;
        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= 255 {
                    ParseError {
                        token: self.peek().clone(),
                        message: String::from("Can't have more than 255 parameters"),
                    }
                    .throw();
                }

                let param_name = self.consume(Type::Identifier, "Expect parameter name")?.clone();
                let default = if matches!(self, Type::Equal) {
                    seen_default = true;
                    Some(self.logical_or()?)
                } else {
                    if seen_default {
                        ParseError {
                            token: param_name.clone(),
                            message: String::from(
                                "A non-default parameter cannot follow a default parameter",
                            ),
                        }
                        .throw();
                    }
                    None
                };

                params.push(Param { name: param_name, default });

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expect ')' after parameters")?;
        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body"))?;
        let body = self.block()?;

        Ok(Stmt::Function(FunctionData { name, params, body }))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if matches!(self, Type::For) {
            return self.for_statement();
        }
        if matches!(self, Type::If) {
            return self.if_statement();
        }
        if matches!(self, Type::While) {
            return self.while_statement();
        }
        if matches!(self, Type::Print) {
            return self.print_statement();
        }
        if matches!(self, Type::Return) {
            return self.return_statement();
        }
        if matches!(self, Type::LeftBrace) {
            return Ok(Stmt::Block(BlockData { statements: self.block()? }));
        }

        self.expression_statement()
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        self.consume(Type::RightBrace, "Expect '}' after block")?;
        Ok(statements)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        let mut conditions = Vec::new();

        let condition = self.expression()?;
        self.consume(Type::LeftBrace, "Expect '{' after if condition")?;
        let branch = Stmt::Block(BlockData { statements: self.block()? });
        conditions.push((condition, branch));

        while matches!(self, Type::ElseIf) {
            let condition = self.expression()?;
            self.consume(Type::LeftBrace, "Expect '{' after elseif condition")?;
            let branch = Stmt::Block(BlockData { statements: self.block()? });
            conditions.push((condition, branch));
        }

        let else_branch = if matches!(self, Type::Else) {
            if matches!(self, Type::LeftBrace) {
                Some(Box::new(Stmt::Block(BlockData { statements: self.block()? })))
            } else {
                Some(Box::new(self.statement()?))
            }
        } else {
            None
        };

        Ok(Stmt::If(IfData { conditions, else_branch }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let condition = self.expression()?;
        self.consume(Type::LeftBrace, "Expect '{' after while condition")?;
        let body = Stmt::Block(BlockData { statements: self.block()? });

        Ok(Stmt::While(WhileData { condition, body: Box::new(body) }))
    }

    /// Disambiguates the classic three-clause `for` from `for (x of it)` by
    /// probing for an `of` token after an optional `var` and one identifier.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        self.consume(Type::LeftParen, "Expect '(' after 'for'")?;

        let var_offset = if self.check(Type::Var) { 1 } else { 0 };
        if self.check_at(var_offset, Type::Identifier) && self.check_at(var_offset + 1, Type::Of) {
            if var_offset == 1 {
                self.advance();
            }
            let iter_var = self.consume(Type::Identifier, "Expect loop variable name")?.clone();
            self.consume(Type::Of, "Expect 'of' in for-of loop")?;
            let iterable = self.expression()?;
            self.consume(Type::RightParen, "Expect ')' after for-of clause")?;
            self.consume(Type::LeftBrace, "Expect '{' before for-of body")?;
            let body = Stmt::Block(BlockData { statements: self.block()? });

            return Ok(Stmt::For(ForData { keyword, iter_var, iterable, body: Box::new(body) }));
        }

        let initializer = if matches!(self, Type::Semicolon) {
            None
        } else if matches!(self, Type::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Type::Semicolon) {
            self.expression()?
        } else {
            Expr::Literal(Literal::Bool(true))
        };
        self.consume(Type::Semicolon, "Expect ';' after loop condition")?;

        let increment = if !self.check(Type::RightParen) { Some(self.expression()?) } else { None };
        self.consume(Type::RightParen, "Expect ')' after for clauses")?;
        self.consume(Type::LeftBrace, "Expect '{' before for body")?;
        let mut body = Stmt::Block(BlockData { statements: self.block()? });

        if let Some(increment) = increment {
            body = Stmt::Block(BlockData {
                statements: vec![body, Stmt::Expression(ExpressionData { expr: increment })],
            });
        }

        body = Stmt::While(WhileData { condition, body: Box::new(body) });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockData { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after value")?;
        Ok(Stmt::Print(PrintData { expr }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if !self.check(Type::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(Type::Semicolon, "Expect ';' after return value")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after expression")?;
        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.logical_or()?;

        if matches!(self, Type::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;
            return Self::finish_assign(expr, None, value, &equals);
        }

        if matches!(self, Type::PlusEqual, Type::MinusEqual, Type::StarEqual, Type::SlashEqual) {
            let compound = self.previous().clone();
            let binary_type = match compound.r#type {
                Type::PlusEqual => Type::Plus,
                Type::MinusEqual => Type::Minus,
                Type::StarEqual => Type::Star,
                Type::SlashEqual => Type::Slash,
                _ => unreachable!(),
            };
            let operator = Token::new(
                binary_type,
                compound.lexeme[..1].to_string(),
                None,
                compound.location,
            );
            let value = self.assignment()?;
            return Self::finish_assign(expr, Some(operator), value, &compound);
        }

        Ok(expr)
    }

    /// Builds the assignment node for `target`. `op` is `Some` for a compound
    /// assignment, in which case `value` is just the right-hand operand: the
    /// interpreter reads `target`'s current value, applies `op`, and writes the
    /// result back, evaluating any side-effecting sub-expression of `target`
    /// (e.g. the object of a `Get`) exactly once.
    fn finish_assign(target: Expr, op: Option<Token>, value: Expr, op_token: &Token) -> ParseResult<Expr> {
        match target {
            Expr::Variable(data) => Ok(Expr::assign(data.name, op, value)),
            Expr::Get(data) => Ok(Expr::set(*data.object, data.name, op, value)),
            _ => Err(ParseError {
                token: op_token.clone(),
                message: String::from("Invalid assignment target"),
            }),
        }
    }

    fn logical_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.logical_and()?;
        while matches!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.logical_and()?;
            expr = Expr::logical(expr, operator, right);
        }
        Ok(expr)
    }

    fn logical_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;
        while matches!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::logical(expr, operator, right);
        }
        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;
        while matches!(self, Type::BangEqual, Type::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;
        while matches!(self, Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;
        while matches!(self, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;
        while matches!(self, Type::Slash, Type::Star) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::Bang, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::unary(operator, right));
        }
        self.call()
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(self, Type::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if matches!(self, Type::Dot) {
                let name = self.consume(Type::Identifier, "Expect property name after '.'")?.clone();
                expr = Expr::get(expr, name);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    ParseError {
                        token: self.peek().clone(),
                        message: String::from("Can't have more than 255 arguments"),
                    }
                    .throw();
                }
                arguments.push(self.expression()?);
                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments")?.clone();
        Ok(Expr::call(callee, paren, arguments))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::False) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }
        if matches!(self, Type::True) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }
        if matches!(self, Type::Nil) {
            return Ok(Expr::Literal(Literal::Nil));
        }
        if matches!(self, Type::Number, Type::String) {
            return Ok(Expr::Literal(
                self.previous().literal.clone().expect("scanner to attach a literal"),
            ));
        }
        if matches!(self, Type::Range) {
            return match self.previous().literal.clone() {
                Some(Literal::Range(start, stop)) => Ok(Expr::range(
                    Expr::Literal(Literal::Number(Number::Int(start))),
                    Expr::Literal(Literal::Number(Number::Int(stop))),
                )),
                _ => unreachable!("RANGE token without a Range literal"),
            };
        }
        if matches!(self, Type::Super) {
            let keyword = self.previous().clone();
            self.consume(Type::Dot, "Expect '.' after 'super'")?;
            let method = self.consume(Type::Identifier, "Expect superclass method name")?.clone();
            return Ok(Expr::super_(keyword, method));
        }
        if matches!(self, Type::This) {
            return Ok(Expr::this(self.previous().clone()));
        }
        if matches!(self, Type::Identifier) {
            return Ok(Expr::variable(self.previous().clone()));
        }
        if matches!(self, Type::LeftParen) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expect ')' after expression")?;
            return Ok(Expr::grouping(expr));
        }

        Err(ParseError { token: self.peek().clone(), message: String::from("Expect expression") })
    }

    /// Discards tokens until the next likely statement boundary, so a single
    /// parse error doesn't cascade into a wall of spurious follow-on errors.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class
                | Type::Declare
                | Type::Var
                | Type::For
                | Type::If
                | Type::While
                | Type::Print
                | Type::Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}
