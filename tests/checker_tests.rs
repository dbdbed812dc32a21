//! Type inference over whole programs

use quill::ast::statement::{Statement, StatementKind};
use quill::ast::{NodeId, Program};
use quill::parse_source;
use quill::types::{
    CheckFailure, FailedTypeCheck, InferError, Type, TypeCheckOutput, UnifyError, check,
};

fn parse_program(source: &str) -> Program {
    parse_source(source).unwrap_or_else(|e| panic!("parsing failed: {e}"))
}

fn check_ok(source: &str) -> (Program, TypeCheckOutput) {
    let program = parse_program(source);
    let output = check(&program).unwrap_or_else(|e| panic!("type check failed: {e}"));
    (program, output)
}

fn check_err(source: &str) -> FailedTypeCheck {
    let program = parse_program(source);
    check(&program).expect_err("type check should fail")
}

/// The n-th top-level statement of function `name`.
fn statement<'p>(program: &'p Program, name: &str, n: usize) -> &'p Statement {
    &program.function(name).expect("no such function").body.statements[n]
}

fn annotation(output: &TypeCheckOutput, id: NodeId) -> Option<&Type> {
    output.annotations.get(id)
}

#[test]
fn literal_definition_is_int() {
    let (program, output) = check_ok(
        "fn int main() {
            let y = 5;
            return y;
        }",
    );

    let definition = statement(&program, "main", 0);
    let ret = statement(&program, "main", 1);
    assert_eq!(annotation(&output, definition.id), Some(&Type::int()));
    assert_eq!(annotation(&output, ret.id), Some(&Type::int()));
    assert_eq!(output.context.get("main::y"), Some(&Type::int()));
}

#[test]
fn bare_return_is_unit() {
    let (program, output) = check_ok("fn unit main() { return; }");
    let ret = statement(&program, "main", 0);
    assert_eq!(annotation(&output, ret.id), Some(&Type::unit()));
}

#[test]
fn literals_map_to_their_type_names() {
    let (program, output) = check_ok(
        r#"fn unit main() {
            let s = "text";
            let b = false;
            let n = -(3);
        }"#,
    );
    assert_eq!(annotation(&output, statement(&program, "main", 0).id), Some(&Type::string()));
    assert_eq!(annotation(&output, statement(&program, "main", 1).id), Some(&Type::bool()));
    assert_eq!(annotation(&output, statement(&program, "main", 2).id), Some(&Type::int()));
}

#[test]
fn function_signatures_are_curried() {
    let (_, output) = check_ok(
        "fn int add(int a, int b) { return a + b; }
         fn unit main() { }",
    );
    assert_eq!(
        output.context.get("add"),
        Some(&Type::func(Type::int(), Type::func(Type::int(), Type::int())))
    );
    assert_eq!(output.context.get("main"), Some(&Type::unit()));
}

#[test]
fn full_application_is_return_type() {
    let (program, output) = check_ok(
        "fn int add(int a, int b) { return a + b; }
         fn int main() { let r = add(1, 2); return r; }",
    );
    assert_eq!(annotation(&output, statement(&program, "main", 0).id), Some(&Type::int()));
}

#[test]
fn partial_application_leaves_an_arrow() {
    let (program, output) = check_ok(
        "fn int add(int a, int b) { return a + b; }
         fn unit main() { let inc = add(1); }",
    );
    assert_eq!(
        annotation(&output, statement(&program, "main", 0).id),
        Some(&Type::func(Type::int(), Type::int()))
    );
    assert_eq!(
        output.context.get("main::inc"),
        Some(&Type::func(Type::int(), Type::int()))
    );
}

#[test]
fn chained_call_applies_remaining_arguments() {
    let (program, output) = check_ok(
        "fn int add(int a, int b) { return a + b; }
         fn int main() { return add(1)(2); }",
    );
    assert_eq!(annotation(&output, statement(&program, "main", 0).id), Some(&Type::int()));
}

#[test]
fn int_plus_string_is_a_mismatch() {
    let err = check_err(r#"fn int main() { return 1 + "x"; }"#);
    assert_eq!(
        err.cause,
        CheckFailure::Inference(InferError::Unify(UnifyError::Mismatch {
            expected: Type::int(),
            found: Type::string(),
        }))
    );
}

#[test]
fn wrong_argument_type_is_a_mismatch() {
    let err = check_err("fn unit main() { echo(1); }");
    assert!(matches!(
        err.cause,
        CheckFailure::Inference(InferError::Unify(UnifyError::Mismatch { .. }))
    ));
}

#[test]
fn undeclared_identifier_is_unbound() {
    let err = check_err("fn int main() { return y; }");
    assert_eq!(
        err.cause,
        CheckFailure::Inference(InferError::UnboundVariable("main::y".to_string()))
    );
}

#[test]
fn undeclared_function_is_unbound() {
    let err = check_err("fn unit main() { missing(1); }");
    assert!(matches!(
        err.cause,
        CheckFailure::Inference(InferError::UnboundVariable(ref name)) if name == "main::missing"
    ));
}

#[test]
fn failure_carries_statement_position() {
    let program = parse_program("fn int main() {\n    return y;\n}");
    let err = check(&program).unwrap_err();
    assert_eq!(err.span, statement(&program, "main", 0).position);
    assert_eq!(err.cause.to_string(), "unbound variable: main::y");
}

#[test]
fn forward_reference_checks() {
    let (program, output) = check_ok(
        "fn int a() { return b(); }
         fn int b() { return 1; }",
    );
    assert_eq!(annotation(&output, statement(&program, "a", 0).id), Some(&Type::int()));
}

#[test]
fn recursion_checks() {
    check_ok("fn int count(int n) { return count(n - 1); }");
}

#[test]
fn inner_scope_shadowing_resolves_per_scope() {
    let (program, output) = check_ok(
        r#"fn int main() {
            let x = 1;
            if (true) {
                let x = "inner";
                echo(x);
            }
            return x + 1;
        }"#,
    );

    let StatementKind::Conditional(conditional) = &statement(&program, "main", 1).kind else {
        panic!("expected conditional");
    };
    let inner_definition = &conditional.then_block.statements[0];
    let inner_use = &conditional.then_block.statements[1];

    assert_eq!(annotation(&output, inner_definition.id), Some(&Type::string()));
    assert_eq!(annotation(&output, inner_use.id), Some(&Type::unit()));
    assert_eq!(
        annotation(&output, statement(&program, "main", 2).id),
        Some(&Type::int())
    );

    assert_eq!(output.context.get("main::x"), Some(&Type::int()));
    assert_eq!(output.context.get("main::if1::x"), Some(&Type::string()));
}

#[test]
fn each_conditional_gets_a_fresh_scope() {
    let (_, output) = check_ok(
        r#"fn unit main() {
            if (true) { let v = 1; }
            if (false) { let v = "s"; }
        }"#,
    );
    assert_eq!(output.context.get("main::if1::v"), Some(&Type::int()));
    assert_eq!(output.context.get("main::if2::v"), Some(&Type::string()));
}

#[test]
fn conditional_condition_is_annotated() {
    let (program, output) = check_ok("fn unit main() { if (1 - 1) { } }");
    let StatementKind::Conditional(conditional) = &statement(&program, "main", 0).kind else {
        panic!("expected conditional");
    };
    assert_eq!(annotation(&output, conditional.condition.id), Some(&Type::int()));
    assert_eq!(annotation(&output, statement(&program, "main", 0).id), None);
}

#[test]
fn inner_variable_is_not_visible_after_the_block() {
    let err = check_err(
        "fn int main() {
            if (true) { let z = 1; }
            return z;
        }",
    );
    assert_eq!(
        err.cause,
        CheckFailure::Inference(InferError::UnboundVariable("main::z".to_string()))
    );
}

#[test]
fn parameters_are_bound_in_function_scope() {
    let (_, output) = check_ok("fn string id(string s) { return s; }");
    assert_eq!(output.context.get("id::s"), Some(&Type::string()));
}

#[test]
fn same_local_name_in_two_functions_is_distinct() {
    let (_, output) = check_ok(
        r#"fn unit a() { let v = 1; }
           fn unit b() { let v = "s"; }"#,
    );
    assert_eq!(output.context.get("a::v"), Some(&Type::int()));
    assert_eq!(output.context.get("b::v"), Some(&Type::string()));
}

#[test]
fn user_function_overrides_standard_function() {
    let (_, output) = check_ok("fn int echo(int n) { return n; }");
    assert_eq!(output.context.get("echo"), Some(&Type::func(Type::int(), Type::int())));
}

#[test]
fn standard_functions_are_available() {
    let (program, output) = check_ok(
        r#"fn unit main() {
            let s = concat("n = ", to_string(4));
            echo(s);
            echo_int(1);
        }"#,
    );
    assert_eq!(annotation(&output, statement(&program, "main", 0).id), Some(&Type::string()));
    assert_eq!(annotation(&output, statement(&program, "main", 1).id), Some(&Type::unit()));
}

#[test]
fn unknown_argument_type_name() {
    let err = check_err("fn unit f(float x) { }");
    assert_eq!(err.cause, CheckFailure::UnknownTypeName("float".to_string()));
}

#[test]
fn unknown_return_type_name() {
    let err = check_err("fn number main() { return 1; }");
    assert_eq!(err.cause, CheckFailure::UnknownTypeName("number".to_string()));
}

#[test]
fn value_names_are_not_type_names() {
    let err = check_err("fn unit f(int_add x) { }");
    assert_eq!(err.cause, CheckFailure::UnknownTypeName("int_add".to_string()));
}

#[test]
fn nested_block_is_unsupported() {
    let err = check_err("fn unit main() { { echo(\"x\"); } }");
    assert!(matches!(err.cause, CheckFailure::UnsupportedSyntax(_)));
}

#[test]
fn calling_a_literal_is_unsupported() {
    let err = check_err("fn unit main() { (1)(2); }");
    assert!(matches!(err.cause, CheckFailure::UnsupportedSyntax(_)));
}

#[test]
fn redefinition_sees_the_previous_type() {
    let err = check_err(
        r#"fn unit main() {
            let x = 1;
            let x = concat(x, "s");
        }"#,
    );
    assert!(matches!(
        err.cause,
        CheckFailure::Inference(InferError::Unify(UnifyError::Mismatch { .. }))
    ));
}

#[test]
fn checking_is_deterministic() {
    let program = parse_program(
        r#"fn int add(int a, int b) { return a + b; }
           fn int main() {
               let x = add(1, 2);
               if (true) { let x = "s"; echo(x); }
               echo_int(x);
               return x;
           }"#,
    );

    let first = check(&program).unwrap();
    let second = check(&program).unwrap();
    assert_eq!(first, second);
}
