use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::interpreter::Interpreter;
use crate::object::Value;
use crate::token::Token;

/// A method implemented directly in Rust rather than user source, bound to an
/// instance the same way `Function::bind` binds a user method. Backs the
/// `range` native class's `init`/`iter`/`next`.
#[derive(Clone)]
pub struct NativeMethod {
    pub name: String,
    pub min_arity: usize,
    pub max_arity: usize,
    pub function: fn(&mut Interpreter, &Value, Vec<Value>) -> Result<Value, RuntimeError>,
}

impl Debug for NativeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native method {}>", self.name)
    }
}

#[derive(Debug)]
pub struct BoundNativeMethod {
    pub method: NativeMethod,
    pub instance: Value,
}

impl crate::object::Callable for BoundNativeMethod {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.method.function)(interpreter, &self.instance, arguments)
    }

    fn arity(&self) -> (usize, usize) {
        (self.method.min_arity, self.method.max_arity)
    }
}

impl Display for BoundNativeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<bound native method {}>", self.method.name)
    }
}

#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub methods: HashMap<String, Rc<Function>>,
    pub native_methods: HashMap<String, NativeMethod>,
    pub superclass: Option<Rc<RefCell<Class>>>,
}

impl Class {
    pub fn new(
        name: String,
        methods: HashMap<String, Rc<Function>>,
        superclass: Option<Rc<RefCell<Class>>>,
    ) -> Self {
        Class { name, methods, native_methods: HashMap::new(), superclass }
    }

    /// Builds a class whose methods are implemented in Rust, e.g. `range`.
    pub fn native(name: String, native_methods: HashMap<String, NativeMethod>) -> Self {
        Class { name, methods: HashMap::new(), native_methods, superclass: None }
    }

    /// Walks this class, then its superclass chain, looking for `name`.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass.as_ref().and_then(|s| s.borrow().find_method(name))
    }

    pub fn find_native_method(&self, name: &str) -> Option<NativeMethod> {
        if let Some(method) = self.native_methods.get(name) {
            return Some(method.clone());
        }
        self.superclass.as_ref().and_then(|s| s.borrow().find_native_method(name))
    }

    /// A class's arity comes from its `init`, or `(0, 0)` if it declares none.
    pub fn arity(&self) -> (usize, usize) {
        if let Some(init) = self.find_method("init") {
            return init.arity();
        }
        if let Some(init) = self.find_native_method("init") {
            return (init.min_arity, init.max_arity);
        }
        (0, 0)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

#[derive(Debug)]
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Rc<RefCell<Class>>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    /// Fields take precedence over methods; a resolved method comes back
    /// bound to `instance` (so its `this` is fixed regardless of reassignment).
    pub fn get(&self, name: &Token, instance: &Value) -> Result<Value, RuntimeError> {
        if let Some(field) = self.fields.get(&name.lexeme) {
            return Ok(field.clone());
        }

        if let Some(method) = self.class.borrow().find_method(&name.lexeme) {
            return Ok(Value::from(method.bind(instance.clone())));
        }

        if let Some(method) = self.class.borrow().find_native_method(&name.lexeme) {
            return Ok(Value::NativeMethod(Rc::new(BoundNativeMethod {
                method,
                instance: instance.clone(),
            })));
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'", name.lexeme),
        })
    }

    pub fn set(&mut self, name: &Token, value: Value) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<instance {}>", self.class.borrow().name)
    }
}
