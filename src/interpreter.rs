use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use crate::class::{BoundNativeMethod, Class, Instance, NativeMethod};
use crate::environment::Environment;
use crate::error::{Error, RuntimeError};
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, GetData, GroupingData, LogicalData,
    RangeData, SetData, SuperData, ThisData, UnaryData, VariableData,
};
use crate::function::{Function, NativeFunction, ResolvedParam};
use crate::literal::{Literal, Number};
use crate::object::{Callable, Value};
use crate::stmt::{
    BlockData, ClassData, ExpressionData, ForData, FunctionData, IfData, PrintData, ReturnData,
    Stmt, StmtVisitor, VarData, WhileData,
};
use crate::token::{Token, Type};

/// A non-error control-flow unwind. `Return` carries a function's result up to
/// its own `Function::call`; `Error` carries a runtime error up to the
/// top-level `interpret` loop. The idiomatic-Rust analogue of the Lox book's
/// `Return`-via-exception, routed through `Result` instead of a panic.
pub enum Unwind {
    Return(Value),
    Error(RuntimeError),
}

/// Tree-walking evaluator. Holds the global scope, the current scope, and the
/// resolver's node-id → scope-distance side table.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<u64, usize>,
    pub start: Instant,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::get_globals() {
            let name = native.name.clone();
            globals.borrow_mut().define(&name, Value::from(native));
        }
        globals.borrow_mut().define("range", Value::Class(build_range_class()));
        globals.borrow_mut().define("StopIteration", Value::Literal(Literal::StopIteration));

        Interpreter {
            globals: Rc::clone(&globals),
            environment: globals,
            locals: HashMap::new(),
            start: Instant::now(),
        }
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}
                Err(Unwind::Error(err)) => {
                    err.throw();
                    return;
                }
                Err(Unwind::Return(_)) => return,
            }
        }
    }

    /// Like [`interpret`](Self::interpret), but a program consisting of a single bare expression
    /// statement prints its value instead of discarding it — the usual REPL
    /// convenience for quick evaluation. Anything else runs exactly as it would from a file.
    pub fn interpret_repl(&mut self, statements: &[Stmt]) {
        if let [Stmt::Expression(data)] = statements {
            match self.evaluate(&data.expr) {
                Ok(value) => println!("{value}"),
                Err(err) => err.throw(),
            }
            return;
        }
        self.interpret(statements);
    }

    /// Records that the expression node `id` resolved `depth` scopes up from
    /// wherever it is evaluated. Called once per local reference by the resolver.
    pub fn resolve(&mut self, id: u64, depth: usize) {
        self.locals.insert(id, depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        expr.accept(self)
    }

    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();
        self.environment = previous;
        result
    }

    fn execute_in(&mut self, stmt: &Stmt, environment: Rc<RefCell<Environment>>) -> Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = self.execute(stmt);
        self.environment = previous;
        result
    }

    fn look_up_variable(&self, name: &Token, id: u64) -> Result<Value, RuntimeError> {
        match self.locals.get(&id) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn make_function(&mut self, data: &FunctionData, is_initializer: bool) -> Result<Function, RuntimeError> {
        let mut params = Vec::with_capacity(data.params.len());
        for param in &data.params {
            let default = match &param.default {
                Some(expr) => Some(self.evaluate(expr)?),
                None => None,
            };
            params.push(ResolvedParam { name: param.name.clone(), default });
        }

        Ok(Function::new(
            data.name.clone(),
            params,
            Rc::new(data.body.clone()),
            Rc::clone(&self.environment),
            is_initializer,
        ))
    }

    /// Looks up `name` on `instance`, calling it with no caller-visible side
    /// effects beyond its own body. Used by the `for`-of loop to drive the
    /// `iter`/`next` protocol.
    fn call_method(
        &mut self,
        instance: &Value,
        name: &str,
        arguments: Vec<Value>,
        at: &Token,
    ) -> Result<Value, Unwind> {
        let name_token = Token::new(Type::Identifier, name.to_string(), None, at.location);
        let method = match instance {
            Value::Instance(inst) => inst.borrow().get(&name_token, instance).map_err(Unwind::Error)?,
            other => {
                return Err(Unwind::Error(RuntimeError {
                    token: at.clone(),
                    message: format!("'{}' is not iterable", other.type_str()),
                }))
            }
        };
        self.call_value(method, arguments, at).map_err(Unwind::Error)
    }

    fn call_value(&mut self, callee: Value, arguments: Vec<Value>, paren: &Token) -> Result<Value, RuntimeError> {
        let (min, max) = match &callee {
            Value::Function(f) => f.arity(),
            Value::NativeFunction(f) => f.arity(),
            Value::NativeMethod(m) => m.arity(),
            Value::Class(c) => c.borrow().arity(),
            other => {
                return Err(RuntimeError {
                    token: paren.clone(),
                    message: format!("'{}' is not callable", other.type_str()),
                })
            }
        };

        if arguments.len() < min || arguments.len() > max {
            let expected = if min == max { min.to_string() } else { format!("{min}-{max}") };
            return Err(RuntimeError {
                token: paren.clone(),
                message: format!("Expected {expected} argument(s) but got {}", arguments.len()),
            });
        }

        match callee {
            Value::Function(f) => f.call(self, arguments),
            Value::NativeFunction(f) => f.call(self, arguments),
            Value::NativeMethod(m) => m.call(self, arguments),
            Value::Class(class_rc) => {
                let instance_value = Value::from(Instance::new(Rc::clone(&class_rc)));
                let init = class_rc.borrow().find_method("init");
                if let Some(init) = init {
                    init.bind(instance_value.clone()).call(self, arguments)?;
                } else if let Some(native_init) = class_rc.borrow().find_native_method("init") {
                    (native_init.function)(self, &instance_value, arguments)?;
                }
                Ok(instance_value)
            }
            _ => unreachable!(),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn numeric_operand_error(operator: &Token) -> RuntimeError {
    RuntimeError { token: operator.clone(), message: String::from("Operands must be numbers") }
}

/// Applies a binary operator to already-evaluated operands. Shared by plain
/// binary expressions and by compound assignment, which evaluates its target
/// exactly once and then reapplies the operator to the current value and the
/// right-hand operand.
fn apply_binary_op(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match operator.r#type {
        Type::Minus | Type::Star | Type::Slash => {
            let l = left.as_number().ok_or_else(|| numeric_operand_error(operator))?;
            let r = right.as_number().ok_or_else(|| numeric_operand_error(operator))?;
            match operator.r#type {
                Type::Minus => Ok(Value::from(l.sub(&r))),
                Type::Star => Ok(Value::from(l.mul(&r))),
                Type::Slash => {
                    if r.is_zero() {
                        return Err(RuntimeError {
                            token: operator.clone(),
                            message: String::from("Division by zero"),
                        });
                    }
                    Ok(Value::from(l.div(&r)))
                }
                _ => unreachable!(),
            }
        }
        Type::Plus => match (&left, &right) {
            (Value::Literal(Literal::Number(l)), Value::Literal(Literal::Number(r))) => Ok(Value::from(l.add(r))),
            (Value::Literal(Literal::String(_)), _) | (_, Value::Literal(Literal::String(_))) => {
                Ok(Value::from(format!("{left}{right}")))
            }
            _ => Err(RuntimeError {
                token: operator.clone(),
                message: String::from("Operands must be two numbers or two strings"),
            }),
        },
        Type::Greater | Type::GreaterEqual | Type::Less | Type::LessEqual => {
            let l = left.as_number().ok_or_else(|| numeric_operand_error(operator))?;
            let r = right.as_number().ok_or_else(|| numeric_operand_error(operator))?;
            let result = match operator.r#type {
                Type::Greater => l > r,
                Type::GreaterEqual => l >= r,
                Type::Less => l < r,
                Type::LessEqual => l <= r,
                _ => unreachable!(),
            };
            Ok(Value::from(result))
        }
        Type::EqualEqual => Ok(Value::from(left == right)),
        Type::BangEqual => Ok(Value::from(left != right)),
        _ => unreachable!(),
    }
}

impl ExprVisitor<Result<Value, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, data: &Literal) -> Result<Value, RuntimeError> {
        Ok(Value::Literal(data.clone()))
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> Result<Value, RuntimeError> {
        self.look_up_variable(&data.name, data.id)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> Result<Value, RuntimeError> {
        let rhs = self.evaluate(&data.value)?;
        let distance = self.locals.get(&data.id).copied();

        let value = match &data.op {
            Some(op) => {
                let current = match distance {
                    Some(d) => self.environment.borrow().get_at(d, &data.name)?,
                    None => self.globals.borrow().get(&data.name)?,
                };
                apply_binary_op(op, current, rhs)?
            }
            None => rhs,
        };

        match distance {
            Some(d) => self.environment.borrow_mut().assign_at(d, &data.name, value.clone())?,
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }
        Ok(value)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Result<Value, RuntimeError> {
        let right = self.evaluate(&data.right)?;
        match data.operator.r#type {
            Type::Minus => {
                let n = right.as_number().ok_or_else(|| numeric_operand_error(&data.operator))?;
                Ok(Value::from(n.neg()))
            }
            Type::Plus => {
                let n = right.as_number().ok_or_else(|| numeric_operand_error(&data.operator))?;
                Ok(Value::from(n.abs()))
            }
            Type::Bang => Ok(Value::from(!right.as_bool())),
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        apply_binary_op(&data.operator, left, right)
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        match data.operator.r#type {
            Type::Or if left.as_bool() => return Ok(left),
            Type::And if !left.as_bool() => return Ok(left),
            Type::Or | Type::And => {}
            _ => unreachable!(),
        }
        self.evaluate(&data.right)
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> Result<Value, RuntimeError> {
        self.evaluate(&data.expression)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        self.call_value(callee, arguments, &data.paren)
    }

    fn visit_get_expr(&mut self, data: &GetData) -> Result<Value, RuntimeError> {
        let object = self.evaluate(&data.object)?;
        match &object {
            Value::Instance(instance) => instance.borrow().get(&data.name, &object),
            other => Err(RuntimeError {
                token: data.name.clone(),
                message: format!("Only instances have properties, got '{}'", other.type_str()),
            }),
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> Result<Value, RuntimeError> {
        let object = self.evaluate(&data.object)?;
        let rhs = self.evaluate(&data.value)?;
        match &object {
            Value::Instance(instance) => {
                let value = match &data.op {
                    Some(op) => {
                        let current = instance.borrow().get(&data.name, &object)?;
                        apply_binary_op(op, current, rhs)?
                    }
                    None => rhs,
                };
                instance.borrow_mut().set(&data.name, value.clone());
                Ok(value)
            }
            other => Err(RuntimeError {
                token: data.name.clone(),
                message: format!("Only instances have fields, got '{}'", other.type_str()),
            }),
        }
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> Result<Value, RuntimeError> {
        self.look_up_variable(&data.keyword, data.id)
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> Result<Value, RuntimeError> {
        let distance = *self.locals.get(&data.id).ok_or_else(|| RuntimeError {
            token: data.keyword.clone(),
            message: String::from("Unresolved 'super'"),
        })?;

        let superclass = self.environment.borrow().get_at(distance, &Token::from("super"))?;
        let instance = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        let class_rc = match superclass {
            Value::Class(c) => c,
            _ => unreachable!("resolver only binds 'super' to a class"),
        };

        if let Some(method) = class_rc.borrow().find_method(&data.method.lexeme) {
            return Ok(Value::from(method.bind(instance)));
        }
        if let Some(method) = class_rc.borrow().find_native_method(&data.method.lexeme) {
            return Ok(Value::from(BoundNativeMethod { method, instance }));
        }

        Err(RuntimeError {
            token: data.method.clone(),
            message: format!("Undefined property '{}'", data.method.lexeme),
        })
    }

    fn visit_range_expr(&mut self, data: &RangeData) -> Result<Value, RuntimeError> {
        let start = self.evaluate(&data.start)?;
        let stop = self.evaluate(&data.stop)?;
        let range_class = self.globals.borrow().get(&Token::from("range"))?;
        self.call_value(range_class, vec![start, stop], &Token::from("range"))
    }
}

impl StmtVisitor<Result<(), Unwind>> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<(), Unwind> {
        self.evaluate(&data.expr).map_err(Unwind::Error)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<(), Unwind> {
        let value = self.evaluate(&data.expr).map_err(Unwind::Error)?;
        println!("{value}");
        Ok(())
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<(), Unwind> {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer).map_err(Unwind::Error)?,
            None => Value::Literal(Literal::Nil),
        };
        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<(), Unwind> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, environment)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<(), Unwind> {
        for (condition, branch) in &data.conditions {
            if self.evaluate(condition).map_err(Unwind::Error)?.as_bool() {
                return self.execute(branch);
            }
        }
        if let Some(else_branch) = &data.else_branch {
            return self.execute(else_branch);
        }
        Ok(())
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<(), Unwind> {
        while self.evaluate(&data.condition).map_err(Unwind::Error)?.as_bool() {
            self.execute(&data.body)?;
        }
        Ok(())
    }

    fn visit_for_stmt(&mut self, data: &ForData) -> Result<(), Unwind> {
        let iterable = self.evaluate(&data.iterable).map_err(Unwind::Error)?;
        if !matches!(iterable, Value::Instance(_)) {
            return Err(Unwind::Error(RuntimeError {
                token: data.keyword.clone(),
                message: format!("'{}' is not iterable", iterable.type_str()),
            }));
        }

        let iterator = self.call_method(&iterable, "iter", vec![], &data.keyword)?;

        let loop_environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        loop_environment.borrow_mut().define(&data.iter_var.lexeme, Value::Literal(Literal::Nil));

        loop {
            let value = self.call_method(&iterator, "next", vec![], &data.keyword)?;
            if value == Value::Literal(Literal::StopIteration) {
                break;
            }
            loop_environment.borrow_mut().define(&data.iter_var.lexeme, value);
            self.execute_in(&data.body, Rc::clone(&loop_environment))?;
        }

        Ok(())
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) -> Result<(), Unwind> {
        let function = self.make_function(data, false).map_err(Unwind::Error)?;
        self.environment.borrow_mut().define(&data.name.lexeme, Value::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<(), Unwind> {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr).map_err(Unwind::Error)?,
            None => Value::Literal(Literal::Nil),
        };
        Err(Unwind::Return(value))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Result<(), Unwind> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr).map_err(Unwind::Error)?;
                match value {
                    Value::Class(c) => Some(c),
                    _ => {
                        let token = match expr {
                            Expr::Variable(v) => v.name.clone(),
                            _ => data.name.clone(),
                        };
                        return Err(Unwind::Error(RuntimeError {
                            token,
                            message: String::from("Superclass must be a class"),
                        }));
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Value::Literal(Literal::Nil));

        let previous_environment = Rc::clone(&self.environment);
        if let Some(superclass) = &superclass {
            let environment = Environment::new(Some(Rc::clone(&self.environment)));
            self.environment = Rc::new(RefCell::new(environment));
            self.environment.borrow_mut().define("super", Value::Class(Rc::clone(superclass)));
        }

        let mut methods = HashMap::new();
        for method in &data.methods {
            if let Stmt::Function(func_data) = method {
                let is_initializer = func_data.name.lexeme == "init";
                let function = self.make_function(func_data, is_initializer).map_err(Unwind::Error)?;
                methods.insert(func_data.name.lexeme.clone(), Rc::new(function));
            }
        }

        let class = Class::new(data.name.lexeme.clone(), methods, superclass);
        let class_value = Value::Class(Rc::new(RefCell::new(class)));

        if data.superclass.is_some() {
            self.environment = previous_environment;
        }

        self.environment.borrow_mut().assign(&data.name, class_value).map_err(Unwind::Error)?;
        Ok(())
    }
}

fn range_field(instance: &Rc<RefCell<Instance>>, field: &str) -> i64 {
    match instance.borrow().fields.get(field) {
        Some(Value::Literal(Literal::Number(Number::Int(n)))) => *n,
        Some(Value::Literal(Literal::Number(Number::Float(n)))) => *n as i64,
        _ => 0,
    }
}

fn range_as_int(value: &Value) -> i64 {
    value.as_number().map(|n| n.as_f64() as i64).unwrap_or(0)
}

/// `range(stop)`, `range(start, stop)`, or `range(start, stop, step)`.
fn range_init(_interpreter: &mut Interpreter, this: &Value, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    let instance = match this {
        Value::Instance(instance) => instance,
        _ => unreachable!("range is only ever constructed through Interpreter::call_value"),
    };

    let (start, stop, step) = match arguments.len() {
        1 => (0, range_as_int(&arguments[0]), 1),
        2 => (range_as_int(&arguments[0]), range_as_int(&arguments[1]), 1),
        _ => (range_as_int(&arguments[0]), range_as_int(&arguments[1]), range_as_int(&arguments[2])),
    };

    let mut instance = instance.borrow_mut();
    instance.fields.insert(String::from("start"), Value::from(start));
    instance.fields.insert(String::from("stop"), Value::from(stop));
    instance.fields.insert(String::from("step"), Value::from(step));
    instance.fields.insert(String::from("index"), Value::from(0i64));

    Ok(Value::Literal(Literal::Nil))
}

fn range_iter(_interpreter: &mut Interpreter, this: &Value, _arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    Ok(this.clone())
}

fn range_next(_interpreter: &mut Interpreter, this: &Value, _arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    let instance = match this {
        Value::Instance(instance) => instance,
        _ => unreachable!("range is only ever constructed through Interpreter::call_value"),
    };

    let start = range_field(instance, "start");
    let stop = range_field(instance, "stop");
    let step = range_field(instance, "step");
    let index = range_field(instance, "index");

    if step == 0 {
        return Ok(Value::Literal(Literal::StopIteration));
    }

    let value = start + index * step;
    let done = if step > 0 { value >= stop } else { value <= stop };
    if done {
        return Ok(Value::Literal(Literal::StopIteration));
    }

    instance.borrow_mut().fields.insert(String::from("index"), Value::from(index + 1));
    Ok(Value::from(value))
}

fn build_range_class() -> Rc<RefCell<Class>> {
    let mut native_methods = HashMap::new();
    native_methods.insert(
        String::from("init"),
        NativeMethod { name: String::from("init"), min_arity: 1, max_arity: 3, function: range_init },
    );
    native_methods.insert(
        String::from("iter"),
        NativeMethod { name: String::from("iter"), min_arity: 0, max_arity: 0, function: range_iter },
    );
    native_methods.insert(
        String::from("next"),
        NativeMethod { name: String::from("next"), min_arity: 0, max_arity: 0, function: range_next },
    );
    Rc::new(RefCell::new(Class::native(String::from("range"), native_methods)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> Interpreter {
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

    #[test]
    fn evaluates_arithmetic() {
        let interpreter = run("var a = 1 + 2 * 3;");
        let value = interpreter.globals.borrow().get(&Token::from("a")).unwrap();
        assert_eq!(value, Value::from(7i64));
    }

    #[test]
    fn integer_division_promotes_to_float_when_inexact() {
        let interpreter = run("var a = 7 / 2; var b = 8 / 2;");
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("a")).unwrap(),
            Value::from(3.5)
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("b")).unwrap(),
            Value::from(4i64)
        );
    }

    #[test]
    fn string_concatenation_via_plus() {
        let interpreter = run(r#"var a = "foo" + "bar";"#);
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("a")).unwrap(),
            Value::from("foobar")
        );
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let interpreter = run(
            r#"
            declare make_counter() {
                var count = 0;
                declare counter() {
                    count = count + 1;
                    return count;
                }
                return counter;
            }
            var counter = make_counter();
            var a = counter();
            var b = counter();
            "#,
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("a")).unwrap(),
            Value::from(1i64)
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("b")).unwrap(),
            Value::from(2i64)
        );
    }

    #[test]
    fn default_parameters_are_evaluated_at_declaration_time() {
        let interpreter = run(
            r#"
            var base = 10;
            declare add(x, y = base) {
                return x + y;
            }
            base = 1000;
            var a = add(1);
            "#,
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("a")).unwrap(),
            Value::from(11i64)
        );
    }

    #[test]
    fn class_init_and_method_dispatch() {
        let interpreter = run(
            r#"
            class Counter {
                init() {
                    this.count = 0;
                }
                increment() {
                    this.count = this.count + 1;
                    return this.count;
                }
            }
            var c = Counter();
            c.increment();
            var a = c.increment();
            "#,
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("a")).unwrap(),
            Value::from(2i64)
        );
    }

    #[test]
    fn superclass_method_dispatch() {
        let interpreter = run(
            r#"
            class Animal {
                speak() {
                    return "...";
                }
            }
            class Dog < Animal {
                speak() {
                    return "Woof, " + super.speak();
                }
            }
            var a = Dog().speak();
            "#,
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("a")).unwrap(),
            Value::from("Woof, ...")
        );
    }

    #[test]
    fn range_iteration_yields_expected_sequence() {
        let interpreter = run(
            r#"
            var total = 0;
            for (i of range(0, 5)) {
                total = total + i;
            }
            "#,
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("total")).unwrap(),
            Value::from(10i64)
        );
    }

    #[test]
    fn range_literal_desugars_to_range_call() {
        let interpreter = run(
            r#"
            var total = 0;
            for (i of 0..3) {
                total = total + i;
            }
            "#,
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("total")).unwrap(),
            Value::from(3i64)
        );
    }

    #[test]
    fn elseif_chain_picks_first_truthy_branch() {
        let interpreter = run(
            r#"
            var x = 2;
            var result = "none";
            if (x == 1) {
                result = "one";
            } elseif (x == 2) {
                result = "two";
            } else {
                result = "other";
            }
            "#,
        );
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("result")).unwrap(),
            Value::from("two")
        );
    }

    #[test]
    fn compound_assignment_desugars_to_binary_op() {
        let interpreter = run("var a = 1; a += 2; a *= 3;");
        assert_eq!(
            interpreter.globals.borrow().get(&Token::from("a")).unwrap(),
            Value::from(9i64)
        );
    }
}
