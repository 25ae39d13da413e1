use serval::parser::parse;
use serval::value::Value;
use serval::{new_interpreter, run_source};

#[test]
fn round_trip_printing_of_non_procedure_datums() {
    for src in ["42", "#t", "#f", "\"hi\"", "a", "()", "(1 2 3)", "(1 . 2)", "(a (b c) d)"] {
        let mut parsed = parse(src).expect("parse should succeed");
        assert_eq!(parsed.len(), 1);
        let datum = parsed.remove(0);
        let printed = datum.to_string();
        let mut reparsed = parse(&printed).expect("reparse should succeed");
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed.remove(0), datum, "round trip failed for {src}");
    }
}

#[test]
fn only_boolean_false_is_falsy() {
    let env = new_interpreter();
    for src in ["0", "'()", "\"\"", "'sym", "#t"] {
        let result = run_source(&format!("(if {src} 'y 'n)"), &env).expect("eval should succeed");
        assert_eq!(result, Value::symbol("y"), "{src} should be truthy");
    }
    let result = run_source("(if #f 'y 'n)", &env).expect("eval should succeed");
    assert_eq!(result, Value::symbol("n"));
}

#[test]
fn closures_resolve_free_variables_in_their_defining_environment() {
    let env = new_interpreter();
    run_source("(define x 1) (define (get-x) x)", &env).unwrap();
    // Shadow x in a nested frame and call through a lambda defined before the shadow.
    let result = run_source("(let ((x 2)) (get-x))", &env).expect("eval should succeed");
    assert_eq!(result, Value::Number(1));
}

#[test]
fn define_in_the_same_frame_rebinds() {
    let env = new_interpreter();
    let result = run_source("(define v 1) (define v 2) v", &env).expect("eval should succeed");
    assert_eq!(result, Value::Number(2));
}

#[test]
fn set_in_a_nested_frame_is_observed_from_the_outer_frame() {
    let env = new_interpreter();
    run_source("(define v 1) (define (bump) (set! v (+ v 1)))", &env).unwrap();
    run_source("(bump)", &env).unwrap();
    let result = run_source("v", &env).expect("eval should succeed");
    assert_eq!(result, Value::Number(2));
}

#[test]
fn and_does_not_evaluate_past_a_false_argument() {
    let env = new_interpreter();
    // (car '()) would be a type error if ever evaluated.
    let result = run_source("(and #f (car '()))", &env).expect("eval should succeed");
    assert_eq!(result, Value::Boolean(false));
}

#[test]
fn or_does_not_evaluate_past_a_truthy_argument() {
    let env = new_interpreter();
    let result = run_source("(or 1 (car '()))", &env).expect("eval should succeed");
    assert_eq!(result, Value::Number(1));
}
