mod common;

use common::{global, run};
use rocks_lang::object::Value;

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
        var other = make_counter();
        var c = other();
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from(1i64));
    assert_eq!(global(&interpreter, "b"), Value::from(2i64));
    assert_eq!(global(&interpreter, "c"), Value::from(1i64));
}

#[test]
fn default_parameters_are_evaluated_once_at_declaration_time() {
    let interpreter = run(
        r#"
        var base = 10;
        declare add(x, y = base) {
            return x + y;
        }
        base = 1000;
        var a = add(1);
        var b = add(1, 2);
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from(11i64));
    assert_eq!(global(&interpreter, "b"), Value::from(3i64));
}

#[test]
fn default_parameters_must_follow_required_parameters() {
    let interpreter = run(
        r#"
        declare greet(name = "world") {
            return "hi " + name;
        }
        var a = greet();
        var b = greet("rocks");
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from("hi world"));
    assert_eq!(global(&interpreter, "b"), Value::from("hi rocks"));
}

#[test]
fn calling_with_too_few_arguments_is_a_runtime_error() {
    let interpreter = run(
        r#"
        declare needs_two(a, b) {
            return a + b;
        }
        var a = needs_two(1);
        "#,
    );
    assert!(interpreter.globals.borrow().get(&rocks_lang::token::Token::from("a")).is_err());
}

#[test]
fn functions_return_nil_when_no_return_statement_runs() {
    let interpreter = run(
        r#"
        declare noop() {
            var x = 1;
        }
        var a = noop();
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from(rocks_lang::literal::Literal::Nil));
}

#[test]
fn recursive_functions_see_their_own_name() {
    let interpreter = run(
        r#"
        declare fact(n) {
            if (n <= 1) {
                return 1;
            }
            return n * fact(n - 1);
        }
        var a = fact(5);
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from(120i64));
}
