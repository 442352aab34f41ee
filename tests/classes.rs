mod common;

use common::{global, run};
use rocks_lang::object::Value;

#[test]
fn init_sets_fields_and_methods_read_them_back() {
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
    assert_eq!(global(&interpreter, "a"), Value::from(2i64));
}

#[test]
fn init_always_returns_the_instance_regardless_of_return_value() {
    let interpreter = run(
        r#"
        class Thing {
            init() {
                this.tag = "made";
                return;
            }
        }
        var t = Thing();
        var a = t.tag;
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from("made"));
}

#[test]
fn methods_are_bound_to_the_instance_they_were_read_from() {
    let interpreter = run(
        r#"
        class Greeter {
            init(name) {
                this.name = name;
            }
            greet() {
                return "hi " + this.name;
            }
        }
        var a = Greeter("a").greet;
        var b = Greeter("b").greet;
        var result = a() + " " + b();
        "#,
    );
    assert_eq!(global(&interpreter, "result"), Value::from("hi a hi b"));
}

#[test]
fn superclass_method_dispatch_and_super_call() {
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
    assert_eq!(global(&interpreter, "a"), Value::from("Woof, ..."));
}

#[test]
fn subclass_inherits_unoverridden_methods() {
    let interpreter = run(
        r#"
        class Animal {
            init(name) {
                this.name = name;
            }
            describe() {
                return this.name;
            }
        }
        class Dog < Animal {}
        var a = Dog("Rex").describe();
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from("Rex"));
}

#[test]
fn fields_take_precedence_over_methods_with_the_same_name() {
    let interpreter = run(
        r#"
        class Box {
            value() {
                return "method";
            }
        }
        var b = Box();
        b.value = "field";
        var a = b.value;
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from("field"));
}

#[test]
fn getting_an_undefined_property_is_a_runtime_error() {
    let interpreter = run("class Empty {} var e = Empty(); var a = e.missing;");
    assert!(global(&interpreter, "e").to_string().starts_with("<instance Empty>"));
    assert!(interpreter
        .globals
        .borrow()
        .get(&rocks_lang::token::Token::from("a"))
        .is_err());
}
