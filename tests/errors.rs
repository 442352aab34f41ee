use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;

/// Writes `source` to a uniquely named file under the OS temp directory and
/// returns its path, so each exit-code test gets a script file without
/// needing a fixture checked into the repo.
fn script_file(name: &str, source: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("rocks-test-{name}-{}.rocks", std::process::id()));
    fs::write(&path, source).expect("should be able to write a temp script");
    path
}

#[test]
fn exit_code_is_zero_on_success() {
    let path = script_file("ok", "print 1 + 1;");
    Command::cargo_bin("rocks").unwrap().arg(&path).assert().success();
    fs::remove_file(path).ok();
}

#[test]
fn exit_code_is_65_on_a_syntax_error() {
    let path = script_file("syntax", "var a = ;");
    Command::cargo_bin("rocks").unwrap().arg(&path).assert().code(65);
    fs::remove_file(path).ok();
}

#[test]
fn exit_code_is_65_on_a_resolve_error() {
    let path = script_file("resolve", "{ var a = a; }");
    Command::cargo_bin("rocks").unwrap().arg(&path).assert().code(65);
    fs::remove_file(path).ok();
}

#[test]
fn exit_code_is_70_on_a_runtime_error() {
    let path = script_file("runtime", "var a = 1 / 0;");
    Command::cargo_bin("rocks").unwrap().arg(&path).assert().code(70);
    fs::remove_file(path).ok();
}

#[test]
fn exit_code_is_64_when_given_too_many_arguments() {
    Command::cargo_bin("rocks").unwrap().arg("one").arg("two").assert().code(64);
}

#[test]
fn assigning_to_an_undefined_variable_aborts_the_rest_of_the_script() {
    let path = script_file("undefined-assign", "foo = 1; print \"should not print\";");
    Command::cargo_bin("rocks").unwrap().arg(&path).assert().code(70).stdout("");
    fs::remove_file(path).ok();
}
