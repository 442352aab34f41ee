mod common;

use common::{global, run};
use rocks_lang::object::Value;

#[test]
fn range_call_iterates_start_inclusive_stop_exclusive() {
    let interpreter = run(
        r#"
        var total = 0;
        var count = 0;
        for (i of range(2, 5)) {
            total = total + i;
            count = count + 1;
        }
        "#,
    );
    assert_eq!(global(&interpreter, "total"), Value::from(9i64));
    assert_eq!(global(&interpreter, "count"), Value::from(3i64));
}

#[test]
fn range_literal_desugars_to_a_range_call() {
    let interpreter = run(
        r#"
        var total = 0;
        for (i of 0..3) {
            total = total + i;
        }
        "#,
    );
    assert_eq!(global(&interpreter, "total"), Value::from(3i64));
}

#[test]
fn inclusive_range_literal_includes_the_upper_bound() {
    let interpreter = run(
        r#"
        var total = 0;
        for (i of 0..=3) {
            total = total + i;
        }
        "#,
    );
    assert_eq!(global(&interpreter, "total"), Value::from(6i64));
}

#[test]
fn range_with_step_can_count_downward() {
    let interpreter = run(
        r#"
        var values = "";
        for (i of range(5, 0, -1)) {
            values = values + str(i) + ",";
        }
        "#,
    );
    assert_eq!(global(&interpreter, "values"), Value::from("5,4,3,2,1,"));
}

#[test]
fn empty_range_does_not_run_the_body() {
    let interpreter = run(
        r#"
        var ran = false;
        for (i of range(0, 0)) {
            ran = true;
        }
        "#,
    );
    assert_eq!(global(&interpreter, "ran"), Value::from(false));
}

#[test]
fn for_of_drives_a_user_defined_iterator() {
    let interpreter = run(
        r#"
        class Countdown {
            init(from) {
                this.remaining = from;
            }
            iter() {
                return this;
            }
            next() {
                if (this.remaining <= 0) {
                    return StopIteration;
                }
                this.remaining = this.remaining - 1;
                return this.remaining + 1;
            }
        }

        var seen = "";
        for (n of Countdown(3)) {
            seen = seen + str(n);
        }
        "#,
    );
    assert_eq!(global(&interpreter, "seen"), Value::from("321"));
}

#[test]
fn iterating_a_non_iterable_is_a_runtime_error_that_halts_the_script() {
    let interpreter = run("for (x of 5) { } var after = \"reached\";");
    assert!(interpreter
        .globals
        .borrow()
        .get(&rocks_lang::token::Token::from("after"))
        .is_err());
}
