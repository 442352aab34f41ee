mod common;

use common::{global, run};
use rocks_lang::object::Value;

#[test]
fn if_else_picks_the_matching_branch() {
    let interpreter = run(
        r#"
        var result = "unset";
        if (false) {
            result = "then";
        } else {
            result = "else";
        }
        "#,
    );
    assert_eq!(global(&interpreter, "result"), Value::from("else"));
}

#[test]
fn elseif_chain_picks_the_first_truthy_branch() {
    let interpreter = run(
        r#"
        var x = 2;
        var result = "none";
        if (x == 1) {
            result = "one";
        } elseif (x == 2) {
            result = "two";
        } elseif (x == 2) {
            result = "unreachable";
        } else {
            result = "other";
        }
        "#,
    );
    assert_eq!(global(&interpreter, "result"), Value::from("two"));
}

#[test]
fn while_loop_runs_until_condition_is_falsy() {
    let interpreter = run(
        r#"
        var i = 0;
        var total = 0;
        while (i < 5) {
            total = total + i;
            i = i + 1;
        }
        "#,
    );
    assert_eq!(global(&interpreter, "total"), Value::from(10i64));
}

#[test]
fn classic_three_clause_for_loop() {
    let interpreter = run(
        r#"
        var total = 0;
        for (var i = 0; i < 5; i = i + 1) {
            total = total + i;
        }
        "#,
    );
    assert_eq!(global(&interpreter, "total"), Value::from(10i64));
}

#[test]
fn logical_or_short_circuits_on_truthy_left() {
    let interpreter = run(
        r#"
        var calls = 0;
        declare bump() {
            calls = calls + 1;
            return true;
        }
        var result = true or bump();
        "#,
    );
    assert_eq!(global(&interpreter, "calls"), Value::from(0i64));
    assert_eq!(global(&interpreter, "result"), Value::from(true));
}

#[test]
fn logical_and_short_circuits_on_falsy_left() {
    let interpreter = run(
        r#"
        var calls = 0;
        declare bump() {
            calls = calls + 1;
            return true;
        }
        var result = false and bump();
        "#,
    );
    assert_eq!(global(&interpreter, "calls"), Value::from(0i64));
    assert_eq!(global(&interpreter, "result"), Value::from(false));
}

#[test]
fn logical_operators_return_an_operand_not_a_bool() {
    let interpreter = run(r#"var a = nil or "fallback"; var b = "value" and "last";"#);
    assert_eq!(global(&interpreter, "a"), Value::from("fallback"));
    assert_eq!(global(&interpreter, "b"), Value::from("last"));
}
