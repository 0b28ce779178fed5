use std::process::{Command, Output};

fn simplang(file: &str, args: &[&str]) -> Output {
    let path = format!("{}/{}", env!("CARGO_MANIFEST_DIR"), file);
    Command::new(env!("CARGO_BIN_EXE_simplang"))
        .arg(&path)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run simplang on {path}: {e}"))
}

#[test]
fn prints_result_on_stdout() {
    let out = simplang("demos/sum.sl", &["5"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "15\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn negative_arguments_are_accepted() {
    let out = simplang("demos/power.sl", &["-2", "3"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "-8\n");
}

#[test]
fn runtime_error_is_printed_once() {
    let out = simplang("tests/data/undefined_var.sl", &["1"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert_eq!(
        String::from_utf8_lossy(&out.stderr),
        "runtime error: 1:14: variable 'y' not defined\n"
    );
}

#[test]
fn syntax_errors_are_listed_once() {
    let out = simplang("tests/data/syntax_error.sl", &["1"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert_eq!(
        String::from_utf8_lossy(&out.stderr),
        "Generated 1 error(s):\n1: syntax error: 1:18: expected expression, got 'end'\n"
    );
}

#[test]
fn missing_file_is_an_error() {
    let out = simplang("tests/data/does_not_exist.sl", &[]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to open"));
}
