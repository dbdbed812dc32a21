//! End-to-end tests: source to bytecode to VM

use quill::build_source;
use quill::bytecode::Module;
use quill::vm::{self, MAX_CALL_DEPTH, Value, VmError};

/// Build, round-trip through bytes, and run a program
fn run_program(source: &str) -> (Result<Value, VmError>, String) {
    let module = build_source(source).unwrap_or_else(|e| panic!("build failed: {e}"));
    let module = Module::from_bytes(&module.to_bytes()).expect("decoding failed");

    let mut out = Vec::new();
    let result = vm::run(&module, &mut out);
    (result, String::from_utf8(out).expect("output is not utf-8"))
}

fn run_value(source: &str) -> Value {
    let (result, _) = run_program(source);
    result.unwrap_or_else(|e| panic!("run failed: {e}"))
}

#[test]
fn e2e_return_integer() {
    assert_eq!(run_value("fn int main() { return 42; }"), Value::Int(42));
}

#[test]
fn e2e_subtraction_exit_code() {
    let value = run_value("fn int main() { return 5 - 2; }");
    assert_eq!(value, Value::Int(3));
    assert_eq!(value.exit_code(), 3);
}

#[test]
fn e2e_missing_return_is_unit() {
    let value = run_value("fn unit main() { let x = 1; }");
    assert_eq!(value, Value::Unit);
    assert_eq!(value.exit_code(), 0);
}

#[test]
fn e2e_echo_twice() {
    let (result, out) = run_program(r#"fn unit main() { echo("hi"); echo("hi"); }"#);
    assert!(result.is_ok());
    assert_eq!(out, "hihi");
}

#[test]
fn e2e_function_calls() {
    let value = run_value(
        "fn int add(int a, int b) { return a + b; }
         fn int main() { return add(add(1, 2), -4); }",
    );
    assert_eq!(value, Value::Int(-1));
}

#[test]
fn e2e_standard_functions() {
    let (_, out) = run_program(
        r#"fn unit main() {
            let total = 40 + 2;
            echo(concat("total: ", to_string(total)));
            echo_int(-7);
        }"#,
    );
    assert_eq!(out, "total: 42-7");
}

#[test]
fn e2e_conditional_taken_and_skipped() {
    let (_, out) = run_program(
        r#"fn unit main() {
            if (true) { echo("a"); }
            if (false) { echo("b"); }
            if (2 - 2) { echo("c"); }
            if (1) { echo("d"); }
        }"#,
    );
    assert_eq!(out, "ad");
}

#[test]
fn e2e_return_from_conditional() {
    let source = "fn int pick(bool b) {
            if (b) { return 1; }
            return 2;
        }
        fn int main() { return pick(true) - pick(false); }";
    assert_eq!(run_value(source), Value::Int(-1));
}

#[test]
fn e2e_shadowing_in_conditional() {
    let (result, out) = run_program(
        r#"fn int main() {
            let x = 10;
            if (true) {
                let x = "inner";
                echo(x);
            }
            return x;
        }"#,
    );
    assert_eq!(result.unwrap(), Value::Int(10));
    assert_eq!(out, "inner");
}

#[test]
fn e2e_nested_block_runs_but_does_not_type_check() {
    let source = r#"fn unit main() { { echo("x"); } }"#;
    assert!(build_source(source).is_err());
    assert!(quill::parse_source(source).is_ok());
}

#[test]
fn e2e_long_addition_chain_is_rejected_before_checking() {
    let terms = vec!["1"; 3000].join(" + ");
    let source = format!("fn int main() {{ return {terms}; }}");
    assert!(matches!(build_source(&source), Err(quill::BuildError::Parse(_))));
}

#[test]
fn e2e_user_function_shadows_standard_function() {
    let (_, out) = run_program(
        r#"fn unit echo(string s) { echo_int(1); }
           fn unit main() { echo("ignored"); }"#,
    );
    assert_eq!(out, "1");
}

#[test]
fn e2e_countdown_recursion() {
    let source = "fn int down(int n) {
            if (n) { return down(n - 1); }
            return 100;
        }
        fn int main() { return down(500); }";
    assert_eq!(run_value(source), Value::Int(100));
}

#[test]
fn e2e_unbounded_recursion_hits_depth_limit() {
    let (result, _) = run_program(
        "fn int forever(int n) { return forever(n + 1); }
         fn int main() { return forever(0); }",
    );
    assert!(matches!(result, Err(VmError::CallDepthExceeded)));
    assert_eq!(MAX_CALL_DEPTH, 1024);
}

#[test]
fn e2e_overflow_is_reported() {
    let (result, _) = run_program("fn int main() { return 9223372036854775807 + 1; }");
    assert!(matches!(result, Err(VmError::Overflow("ADD"))));
}
