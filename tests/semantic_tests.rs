// tests/semantic_tests.rs
mod common;

use common::{analyze_source, END_TO_END_PROGRAM};
use minipascal::ast::{BinaryOperator, Type, UnaryOperator};
use minipascal::semantic_analyzer::SemanticError;
use minipascal::symbol_table::Category;

fn assert_accepted(source: &str) {
    let analysis = analyze_source(source);
    assert!(analysis.is_accepted(), "Expected no semantic errors, got: {:?}", analysis.errors);
}

fn single_error(source: &str) -> SemanticError {
    let analysis = analyze_source(source);
    assert_eq!(analysis.errors.len(), 1, "Expected exactly one error, got: {:?}", analysis.errors);
    analysis.errors[0].clone()
}

#[test]
fn test_end_to_end_program_is_accepted() {
    assert_accepted(END_TO_END_PROGRAM);
}

#[test]
fn test_duplicate_variable_in_same_scope() {
    let err = single_error("program t; var x: integer; x: boolean; begin end.");
    assert_eq!(err, SemanticError::AlreadyDeclared { name: "x".into(), category: Category::Variable });

    let err = single_error("program t; var a, b, a: integer; begin end.");
    assert_eq!(err, SemanticError::AlreadyDeclared { name: "a".into(), category: Category::Variable });
}

#[test]
fn test_duplicate_subroutine_names() {
    let source = r#"
        program t;
        procedure p; begin end;
        function p: integer; begin p := 1 end;
        begin end.
    "#;
    let err = single_error(source);
    assert_eq!(err, SemanticError::AlreadyDeclared { name: "p".into(), category: Category::Function });
}

#[test]
fn test_duplicate_parameter() {
    let err = single_error("program t; procedure p(a: integer; a: boolean); begin end; begin end.");
    assert_eq!(err, SemanticError::AlreadyDeclared { name: "a".into(), category: Category::Parameter });
}

#[test]
fn test_variable_clashing_with_program_name() {
    let err = single_error("program t; var t: integer; begin end.");
    assert_eq!(err, SemanticError::AlreadyDeclared { name: "t".into(), category: Category::Variable });
}

#[test]
fn test_variable_clashing_with_predeclared_type() {
    let err = single_error("program t; var integer: boolean; begin end.");
    assert_eq!(err, SemanticError::AlreadyDeclared { name: "integer".into(), category: Category::Variable });
}

#[test]
fn test_local_shadows_global() {
    let source = r#"
        program t;
        var x: integer;
        procedure p(x: boolean);
        var y: boolean;
        begin
            y := x;
            x := not y
        end;
        begin
            x := 1;
            p(true)
        end.
    "#;
    assert_accepted(source);
}

#[test]
fn test_local_not_visible_after_scope_closes() {
    let source = r#"
        program t;
        procedure p;
        var local: integer;
        begin local := 1 end;
        begin
            local := 2
        end.
    "#;
    assert_eq!(single_error(source), SemanticError::Undeclared("local".into()));
}

#[test]
fn test_undeclared_variable_in_expression() {
    let err = single_error("program t; var x: integer; begin x := y + 1 end.");
    assert_eq!(err, SemanticError::Undeclared("y".into()));
}

#[test]
fn test_incompatible_assignment_reported_once_and_analysis_continues() {
    let source = r#"
        program t;
        var x: integer; b: boolean;
        begin
            x := true;
            b := x < 3;
            b := 1
        end.
    "#;
    let analysis = analyze_source(source);
    assert_eq!(analysis.errors, vec![
        SemanticError::IncompatibleTypes { name: "x".into(), expected: Type::Integer, found: Type::Boolean },
        SemanticError::IncompatibleTypes { name: "b".into(), expected: Type::Boolean, found: Type::Integer },
    ]);
    assert!(!analysis.is_accepted());
}

#[test]
fn test_non_boolean_conditions() {
    let source = r#"
        program t;
        var x: integer;
        begin
            if x then x := true;
            while x + 1 do x := x - 1
        end.
    "#;
    let analysis = analyze_source(source);
    assert_eq!(analysis.errors, vec![
        SemanticError::ConditionNotBoolean { construct: "if", found: Type::Integer },
        SemanticError::IncompatibleTypes { name: "x".into(), expected: Type::Integer, found: Type::Boolean },
        SemanticError::ConditionNotBoolean { construct: "while", found: Type::Integer },
    ]);
}

#[test]
fn test_equality_requires_matching_operand_types() {
    assert_accepted("program t; var a: integer; b: boolean; begin b := a = 1; b := b <> true end.");

    let err = single_error("program t; var a: integer; b: boolean; begin b := a = b end.");
    assert_eq!(
        err,
        SemanticError::EqualityTypeMismatch { op: BinaryOperator::Eq, left: Type::Integer, right: Type::Boolean }
    );
}

#[test]
fn test_operand_type_mismatches() {
    let err = single_error("program t; var x: integer; b: boolean; begin x := x + b end.");
    assert_eq!(
        err,
        SemanticError::OperandTypeMismatch {
            op: BinaryOperator::Add,
            expected: Type::Integer,
            left: Type::Integer,
            right: Type::Boolean,
        }
    );

    let err = single_error("program t; var b: boolean; begin b := b and 1 end.");
    assert!(matches!(err, SemanticError::OperandTypeMismatch { op: BinaryOperator::And, .. }));

    let err = single_error("program t; var b: boolean; begin b := b < true end.");
    assert!(matches!(err, SemanticError::OperandTypeMismatch { op: BinaryOperator::Lt, expected: Type::Integer, .. }));
}

#[test]
fn test_unary_operand_mismatches() {
    let err = single_error("program t; var b: boolean; begin b := not 1 end.");
    assert_eq!(
        err,
        SemanticError::UnaryOperandMismatch { op: UnaryOperator::Not, expected: Type::Boolean, found: Type::Integer }
    );

    let err = single_error("program t; var x: integer; begin x := -true end.");
    assert_eq!(
        err,
        SemanticError::UnaryOperandMismatch { op: UnaryOperator::Neg, expected: Type::Integer, found: Type::Boolean }
    );
}

#[test]
fn test_call_with_wrong_arity() {
    let source = r#"
        program t;
        procedure p(a: integer; b: boolean); begin end;
        begin
            p(1)
        end.
    "#;
    let err = single_error(source);
    assert_eq!(err, SemanticError::ArityMismatch { name: "p".into(), expected: 2, found: 1 });
}

#[test]
fn test_each_argument_checked_independently() {
    let source = r#"
        program t;
        var x: integer;
        function f(a: integer; b: boolean; c: integer): integer;
        begin f := a end;
        begin
            x := f(true, 1, false)
        end.
    "#;
    let analysis = analyze_source(source);
    let positions: Vec<usize> = analysis
        .errors
        .iter()
        .map(|e| match e {
            SemanticError::ArgumentTypeMismatch { name, position, .. } => {
                assert_eq!(name, "f");
                *position
            }
            other => panic!("Expected argument mismatch, got {:?}", other),
        })
        .collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn test_function_return_idiom_and_recursion() {
    let source = r#"
        program fatorial;
        var n, r: integer;
        function fact(n: integer): integer;
        begin
            if n <= 1 then fact := 1
            else fact := n * fact(n - 1)
        end;
        begin
            read(n);
            r := fact(n);
            write(r)
        end.
    "#;
    assert_accepted(source);
}

#[test]
fn test_function_return_value_of_wrong_type() {
    let err = single_error("program t; function f: boolean; begin f := 1 end; begin end.");
    assert_eq!(err, SemanticError::IncompatibleTypes { name: "f".into(), expected: Type::Boolean, found: Type::Integer });
}

#[test]
fn test_assignment_to_function_name_outside_its_body() {
    let source = r#"
        program t;
        function f: integer; begin f := 1 end;
        begin
            f := 2
        end.
    "#;
    let err = single_error(source);
    assert_eq!(err, SemanticError::NotAssignable { name: "f".into(), category: Category::Function });
}

#[test]
fn test_assignment_to_non_variable_names() {
    let err = single_error("program t; begin integer := 1 end.");
    assert_eq!(err, SemanticError::NotAssignable { name: "integer".into(), category: Category::Type });

    let err = single_error("program t; procedure p; begin end; begin p := 1 end.");
    assert_eq!(err, SemanticError::NotAssignable { name: "p".into(), category: Category::Procedure });

    let err = single_error("program t; begin z := 1 end.");
    assert_eq!(err, SemanticError::Undeclared("z".into()));
}

#[test]
fn test_type_name_is_not_a_value() {
    let err = single_error("program t; var x: integer; begin x := integer end.");
    assert_eq!(err, SemanticError::NotAValue { name: "integer".into(), category: Category::Type });
}

#[test]
fn test_function_called_as_statement() {
    let err = single_error("program t; function f: integer; begin f := 1 end; begin f() end.");
    assert_eq!(err, SemanticError::NotAProcedure { name: "f".into(), category: Category::Function });
}

#[test]
fn test_procedure_used_in_expression() {
    let err = single_error("program t; var x: integer; procedure p; begin end; begin x := p() + 1 end.");
    assert_eq!(err, SemanticError::ProcedureInExpression("p".into()));
}

#[test]
fn test_undeclared_callables() {
    let err = single_error("program t; begin q(1) end.");
    assert_eq!(err, SemanticError::UndeclaredProcedure("q".into()));

    let err = single_error("program t; var x: integer; begin x := g(1) end.");
    assert_eq!(err, SemanticError::UndeclaredFunction("g".into()));

    let err = single_error("program t; var x, y: integer; begin x := y(1) end.");
    assert_eq!(err, SemanticError::NotAFunction { name: "y".into(), category: Category::Variable });
}

#[test]
fn test_read_targets_must_be_variables_or_parameters() {
    assert_accepted("program t; var x: integer; procedure p(a: boolean); begin read(a) end; begin read(x) end.");

    let analysis = analyze_source("program t; var x: integer; begin read(x, y, t) end.");
    assert_eq!(analysis.errors, vec![
        SemanticError::InvalidReadTarget("y".into()),
        SemanticError::InvalidReadTarget("t".into()),
    ]);
}

#[test]
fn test_write_arguments_are_analyzed() {
    let err = single_error("program t; var x: integer; begin write(x, x + true) end.");
    assert!(matches!(err, SemanticError::OperandTypeMismatch { op: BinaryOperator::Add, .. }));
}

#[test]
fn test_error_messages_are_prefixed() {
    let analysis = analyze_source("program t; begin z := 1 end.");
    assert_eq!(analysis.messages(), vec!["Semantic error: Identifier 'z' not declared.".to_string()]);
}

#[test]
fn test_function_call_with_extra_argument() {
    let source = r#"
        program t;
        var x: integer;
        function f(a: integer): integer;
        begin f := a end;
        begin
            x := f(1, 2)
        end.
    "#;
    // the declared return type still flows into the assignment
    let err = single_error(source);
    assert_eq!(err, SemanticError::ArityMismatch { name: "f".into(), expected: 1, found: 2 });
}

#[test]
fn test_sibling_subroutine_locals_are_invisible() {
    let source = r#"
        program t;
        procedure p;
        var local: integer;
        begin local := 1 end;
        procedure q;
        begin
            local := 2
        end;
        begin
            p();
            q()
        end.
    "#;
    assert_eq!(single_error(source), SemanticError::Undeclared("local".into()));
}

#[test]
fn test_bare_reference_to_function_with_parameters() {
    let source = r#"
        program t;
        var x: integer;
        function f(a: integer): integer;
        begin f := a end;
        begin
            x := f
        end.
    "#;
    let err = single_error(source);
    assert_eq!(err, SemanticError::ArityMismatch { name: "f".into(), expected: 1, found: 0 });
}

#[test]
fn test_bare_reference_to_function_without_parameters() {
    let source = r#"
        program t;
        var b: boolean;
        function pronto: boolean;
        begin pronto := true end;
        function espera(n: integer): boolean;
        begin espera := espera and (n > 0) end;
        begin
            b := pronto
        end.
    "#;
    assert_accepted(source);
}
