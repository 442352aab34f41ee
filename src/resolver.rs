use std::collections::HashMap;

use crate::error::{Error, ResolveError};
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, GetData, GroupingData, LogicalData,
    RangeData, SetData, SuperData, ThisData, UnaryData, VariableData,
};
use crate::interpreter::Interpreter;
use crate::literal::Literal;
use crate::stmt::{
    BlockData, ClassData, ExpressionData, ForData, FunctionData, IfData, PrintData, ReturnData,
    Stmt, StmtVisitor, VarData, WhileData,
};
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// A name declared in a local scope: whether its initializer has finished
/// resolving yet (`defined`), and whether any later expression has read it
/// (`used`). A scope popped with an unused binding still in it emits a
/// warning-level diagnostic.
#[derive(Debug, Clone)]
struct Binding {
    name: Token,
    defined: bool,
    used: bool,
}

/// Static scope-resolution pass. Binds every local variable reference to a
/// scope distance recorded on the interpreter, keyed by expression node id.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, Binding>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        self.resolve_stmts(statements);
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            for binding in scope.values() {
                if !binding.used {
                    eprintln!(
                        "[Line {}] Warning: local variable '{}' is never used",
                        binding.name.location.line, binding.name.lexeme
                    );
                }
            }
        }
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                ResolveError {
                    token: name.clone(),
                    message: String::from("A variable with this name is already declared in this scope"),
                }
                .throw();
            }
            scope.insert(name.lexeme.clone(), Binding { name: name.clone(), defined: false, used: false });
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            match scope.get_mut(&name.lexeme) {
                Some(binding) => binding.defined = true,
                None => {
                    scope.insert(name.lexeme.clone(), Binding { name: name.clone(), defined: true, used: false });
                }
            }
        }
    }

    fn resolve_local(&mut self, id: u64, name: &Token) {
        let depth = self.scopes.len();
        for i in (0..depth).rev() {
            if let Some(binding) = self.scopes[i].get_mut(&name.lexeme) {
                binding.used = true;
                self.interpreter.resolve(id, depth - 1 - i);
                return;
            }
        }
        // Not found in any local scope: treated as a global, resolved dynamically.
    }

    fn resolve_function(&mut self, data: &FunctionData, func_type: FunctionType) {
        let enclosing_function = std::mem::replace(&mut self.current_function, func_type);

        for param in &data.params {
            if let Some(default) = &param.default {
                self.resolve_expr(default);
            }
        }

        self.begin_scope();
        for param in &data.params {
            self.declare(&param.name);
            self.define(&param.name);
        }
        self.resolve_stmts(&data.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }
}

impl<'a> ExprVisitor<()> for Resolver<'a> {
    fn visit_literal_expr(&mut self, _data: &Literal) {}

    fn visit_variable_expr(&mut self, data: &VariableData) {
        if let Some(scope) = self.scopes.last() {
            if matches!(scope.get(&data.name.lexeme), Some(binding) if !binding.defined) {
                ResolveError {
                    token: data.name.clone(),
                    message: String::from("Cannot read local variable in its own initializer"),
                }
                .throw();
            }
        }
        self.resolve_local(data.id, &data.name);
    }

    fn visit_assign_expr(&mut self, data: &AssignData) {
        self.resolve_expr(&data.value);
        self.resolve_local(data.id, &data.name);
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) {
        self.resolve_expr(&data.right);
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) {
        self.resolve_expr(&data.expression);
    }

    fn visit_call_expr(&mut self, data: &CallData) {
        self.resolve_expr(&data.callee);
        for argument in &data.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) {
        self.resolve_expr(&data.object);
    }

    fn visit_set_expr(&mut self, data: &SetData) {
        self.resolve_expr(&data.value);
        self.resolve_expr(&data.object);
    }

    fn visit_this_expr(&mut self, data: &ThisData) {
        if self.current_class == ClassType::None {
            ResolveError {
                token: data.keyword.clone(),
                message: String::from("Cannot use 'this' outside of a class"),
            }
            .throw();
            return;
        }
        self.resolve_local(data.id, &data.keyword);
    }

    fn visit_super_expr(&mut self, data: &SuperData) {
        match self.current_class {
            ClassType::None => {
                ResolveError {
                    token: data.keyword.clone(),
                    message: String::from("Cannot use 'super' outside of a class"),
                }
                .throw();
            }
            ClassType::Class => {
                ResolveError {
                    token: data.keyword.clone(),
                    message: String::from("Cannot use 'super' in a class with no superclass"),
                }
                .throw();
            }
            ClassType::Subclass => {}
        }
        self.resolve_local(data.id, &data.keyword);
    }

    fn visit_range_expr(&mut self, data: &RangeData) {
        self.resolve_expr(&data.start);
        self.resolve_expr(&data.stop);
    }
}

impl<'a> StmtVisitor<()> for Resolver<'a> {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_print_stmt(&mut self, data: &PrintData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_var_stmt(&mut self, data: &VarData) {
        self.declare(&data.name);
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&data.name);
    }

    fn visit_block_stmt(&mut self, data: &BlockData) {
        self.begin_scope();
        self.resolve_stmts(&data.statements);
        self.end_scope();
    }

    fn visit_if_stmt(&mut self, data: &IfData) {
        for (condition, branch) in &data.conditions {
            self.resolve_expr(condition);
            self.resolve_stmt(branch);
        }
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.body);
    }

    fn visit_for_stmt(&mut self, data: &ForData) {
        self.resolve_expr(&data.iterable);
        self.begin_scope();
        self.declare(&data.iter_var);
        self.define(&data.iter_var);
        self.resolve_stmt(&data.body);
        self.end_scope();
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) {
        self.declare(&data.name);
        self.define(&data.name);
        self.resolve_function(data, FunctionType::Function);
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) {
        if self.current_function == FunctionType::None {
            ResolveError {
                token: data.keyword.clone(),
                message: String::from("Cannot return from top-level code"),
            }
            .throw();
        }
        if let Some(value) = &data.value {
            if self.current_function == FunctionType::Initializer {
                ResolveError {
                    token: data.keyword.clone(),
                    message: String::from("Cannot return a value from an initializer"),
                }
                .throw();
            }
            self.resolve_expr(value);
        }
    }

    fn visit_class_stmt(&mut self, data: &ClassData) {
        let enclosing_class = std::mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(&data.name);
        self.define(&data.name);

        if let Some(superclass) = &data.superclass {
            if let Expr::Variable(super_data) = superclass {
                if super_data.name.lexeme == data.name.lexeme {
                    ResolveError {
                        token: super_data.name.clone(),
                        message: String::from("A class cannot inherit from itself"),
                    }
                    .throw();
                }
            }
            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass);

            self.begin_scope();
            self.scopes.last_mut().unwrap().insert(
                "super".to_string(),
                Binding { name: Token::from("super"), defined: true, used: true },
            );
        }

        self.begin_scope();
        self.scopes.last_mut().unwrap().insert(
            "this".to_string(),
            Binding { name: Token::from("this"), defined: true, used: true },
        );

        for method in &data.methods {
            if let Stmt::Function(func_data) = method {
                let decl_type = if func_data.name.lexeme == "init" {
                    FunctionType::Initializer
                } else {
                    FunctionType::Method
                };
                self.resolve_function(func_data, decl_type);
            }
        }

        self.end_scope();

        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }
}
