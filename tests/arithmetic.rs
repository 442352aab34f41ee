mod common;

use common::{global, run};
use rocks_lang::object::Value;
use rocks_lang::token::Token;

#[test]
fn operator_precedence_and_grouping() {
    let interpreter = run("var a = (1 + 2) * 3 - 4 / 2;");
    assert_eq!(global(&interpreter, "a"), Value::from(7i64));
}

#[test]
fn integer_division_promotes_to_float_only_when_inexact() {
    let interpreter = run("var a = 7 / 2; var b = 8 / 2;");
    assert_eq!(global(&interpreter, "a"), Value::from(3.5));
    assert_eq!(global(&interpreter, "b"), Value::from(4i64));
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let interpreter = run("var a = 1; var b = a / 0;");
    assert!(interpreter.globals.borrow().get(&Token::from("b")).is_err());
}

#[test]
fn assigning_to_an_undefined_variable_halts_the_script() {
    let interpreter = run(r#"foo = 1; var after = "reached";"#);
    assert!(interpreter.globals.borrow().get(&Token::from("after")).is_err());
}

#[test]
fn string_concatenation_via_plus() {
    let interpreter = run(r#"var a = "foo" + "bar"; var b = "n=" + 4;"#);
    assert_eq!(global(&interpreter, "a"), Value::from("foobar"));
    assert_eq!(global(&interpreter, "b"), Value::from("n=4"));
}

#[test]
fn unary_minus_and_plus_require_numbers() {
    let interpreter = run("var a = -5; var b = +(-5);");
    assert_eq!(global(&interpreter, "a"), Value::from(-5i64));
    assert_eq!(global(&interpreter, "b"), Value::from(5i64));
}

#[test]
fn only_false_and_nil_are_falsy() {
    let interpreter = run(
        r#"
        var a = !nil;
        var b = !false;
        var c = !0;
        var d = !"";
        "#,
    );
    assert_eq!(global(&interpreter, "a"), Value::from(true));
    assert_eq!(global(&interpreter, "b"), Value::from(true));
    assert_eq!(global(&interpreter, "c"), Value::from(false));
    assert_eq!(global(&interpreter, "d"), Value::from(false));
}

#[test]
fn compound_assignment_operators_desugar_to_binary_ops() {
    let interpreter = run("var a = 1; a += 2; a *= 3; a -= 1; a /= 2;");
    assert_eq!(global(&interpreter, "a"), Value::from(4i64));
}

#[test]
fn compound_assignment_on_a_field_evaluates_its_object_once() {
    let interpreter = run(
        r#"
        class Counter {
            init() {
                this.calls = 0;
                this.value = 10;
            }
        }
        var c = Counter();
        declare get_counter() {
            c.calls = c.calls + 1;
            return c;
        }
        get_counter().value -= 1;
        var calls = c.calls;
        var value = c.value;
        "#,
    );
    assert_eq!(global(&interpreter, "calls"), Value::from(1i64));
    assert_eq!(global(&interpreter, "value"), Value::from(9i64));
}
