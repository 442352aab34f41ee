use std::cell::RefCell;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::expr::Param;
use crate::interpreter::{Interpreter, Unwind};
use crate::literal::Literal;
use crate::object::{Callable, Value};
use crate::stmt::Stmt;
use crate::token::Token;

/// A parameter after its default (if any) has been evaluated once, at
/// declaration time, in the defining environment.
#[derive(Debug, Clone)]
pub struct ResolvedParam {
    pub name: Token,
    pub default: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: Token,
    pub params: Vec<ResolvedParam>,
    pub body: Rc<Vec<Stmt>>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(
        name: Token,
        params: Vec<ResolvedParam>,
        body: Rc<Vec<Stmt>>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Function { name, params, body, closure, is_initializer }
    }

    /// Produces a copy of this method bound to `instance`: a new environment,
    /// parented on the method's own closure, that defines `this`.
    pub fn bind(&self, instance: Value) -> Function {
        let environment = Environment::new(Some(Rc::clone(&self.closure)));
        let environment = Rc::new(RefCell::new(environment));
        environment.borrow_mut().define("this", instance);

        Function {
            name: self.name.clone(),
            params: self.params.clone(),
            body: Rc::clone(&self.body),
            closure: environment,
            is_initializer: self.is_initializer,
        }
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let environment = Environment::new(Some(Rc::clone(&self.closure)));
        let environment = Rc::new(RefCell::new(environment));

        for (i, param) in self.params.iter().enumerate() {
            let value = arguments
                .get(i)
                .cloned()
                .or_else(|| param.default.clone())
                .unwrap_or(Value::Literal(Literal::Nil));
            environment.borrow_mut().define(&param.name.lexeme, value);
        }

        let instance = if self.is_initializer {
            Some(self.closure.borrow().get_at(0, &Token::from("this")).ok())
        } else {
            None
        };

        match interpreter.execute_block(&self.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    Ok(instance.flatten().unwrap_or(Value::Literal(Literal::Nil)))
                } else {
                    Ok(Value::Literal(Literal::Nil))
                }
            }
            Err(Unwind::Return(value)) => {
                if self.is_initializer {
                    Ok(instance.flatten().unwrap_or(value))
                } else {
                    Ok(value)
                }
            }
            Err(Unwind::Error(err)) => Err(err),
        }
    }

    fn arity(&self) -> (usize, usize) {
        let max = self.params.len();
        let min = self.params.iter().take_while(|p| p.default.is_none()).count();
        (min, max)
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}

#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub min_arity: usize,
    pub max_arity: usize,
    pub function: fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> (usize, usize) {
        (self.min_arity, self.max_arity)
    }
}

impl NativeFunction {
    /// The seed standard library: `clock`, `str`, `input`, carried from the
    /// teacher's own `NativeFunction::get_globals` precedent.
    pub fn get_globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: "clock".to_owned(),
                min_arity: 0,
                max_arity: 0,
                function: |interpreter, _| Ok(Value::from(interpreter.start.elapsed().as_secs_f64())),
            },
            NativeFunction {
                name: "str".to_owned(),
                min_arity: 0,
                max_arity: 1,
                function: |_, args| match args.first() {
                    Some(value) => Ok(Value::from(value.to_string())),
                    None => Ok(Value::from("")),
                },
            },
            NativeFunction {
                name: "input".to_owned(),
                min_arity: 0,
                max_arity: 0,
                function: |_, _| {
                    let mut input = String::new();
                    std::io::stdin().read_line(&mut input).unwrap_or(0);
                    if input.ends_with('\n') {
                        input.pop();
                        if input.ends_with('\r') {
                            input.pop();
                        }
                    }
                    Ok(Value::from(input))
                },
            },
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
