mod common;

use std::path::Path;

use common::*;
use nesy::{
    error::{LoadError, QueryFailure},
    execution::{BindingValue, ExecutionOutcome, InferenceExecutor, NO_SOLUTION_TEXT},
};

#[test]
fn list_binding_expands_to_one_line_per_element() {
    let answers = vec![binding("Solution", list(&["a", "b", "c", "d"]))];
    let outcome = ExecutionOutcome::from_answers(&answers, "Solution").unwrap();
    assert_eq!(outcome.render(), "a\nb\nc\nd");
}

#[test]
fn scalar_binding_is_a_single_line() {
    let answers = vec![binding("Solution", term("knight(alice)"))];
    let outcome = ExecutionOutcome::from_answers(&answers, "Solution").unwrap();
    assert_eq!(outcome, ExecutionOutcome::Solved { lines: vec!["knight(alice)".into()] });
}

#[test]
fn nested_list_elements_render_in_prolog_syntax() {
    let nested = BindingValue::List(vec![list(&["alice", "red"]), list(&["bob", "blue"])]);
    let outcome = ExecutionOutcome::from_answers(&[binding("S", nested)], "S").unwrap();
    assert_eq!(outcome.render(), "[alice,red]\n[bob,blue]");
}

#[test]
fn only_the_first_answer_is_used() {
    let answers = vec![binding("S", term("first")), binding("S", term("second"))];
    let outcome = ExecutionOutcome::from_answers(&answers, "S").unwrap();
    assert_eq!(outcome.render(), "first");
}

#[test]
fn no_answers_and_empty_bindings_are_no_solution() {
    assert!(matches!(
        ExecutionOutcome::from_answers(&[], "S"),
        Err(QueryFailure::NoAnswers)
    ));
    assert!(matches!(
        ExecutionOutcome::from_answers(&[binding("S", list(&[]))], "S"),
        Err(QueryFailure::NoAnswers)
    ));
    assert!(matches!(
        ExecutionOutcome::from_answers(&[binding("Other", term("x"))], "S"),
        Err(QueryFailure::NoAnswers)
    ));
    assert_eq!(ExecutionOutcome::NoSolution.render(), NO_SOLUTION_TEXT);
}

#[tokio::test]
async fn zero_answers_never_raise() {
    let mut engine = FakeEngine::answering(Vec::new());
    let outcome = InferenceExecutor::default()
        .execute(&mut engine, Path::new("p.pl"))
        .await
        .unwrap();
    assert_eq!(outcome, ExecutionOutcome::NoSolution);
}

#[tokio::test]
async fn query_exception_downgrades_to_no_solution() {
    let mut engine = FakeEngine::raising("Unknown procedure: solve/1");
    let outcome = InferenceExecutor::default()
        .execute(&mut engine, Path::new("p.pl"))
        .await
        .unwrap();
    assert_eq!(outcome.render(), NO_SOLUTION_TEXT);
}

#[tokio::test]
async fn load_error_stops_before_query() {
    let mut engine = FakeEngine::rejecting("Syntax error: Illegal start of term");
    let err = InferenceExecutor::default()
        .execute(&mut engine, Path::new("p.pl"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Rejected { ref diagnostic } if diagnostic.contains("Illegal start")));
    assert!(engine.queries.is_empty());
}

#[tokio::test]
async fn custom_goal_and_variable_are_queried() {
    let mut engine = FakeEngine::answering(vec![binding("Owner", term("norwegian"))]);
    let outcome = InferenceExecutor::new("zebra(Owner)", "Owner")
        .execute(&mut engine, Path::new("p.pl"))
        .await
        .unwrap();
    assert_eq!(outcome.render(), "norwegian");
    assert_eq!(engine.queries, vec![("zebra(Owner)".to_string(), "Owner".to_string())]);
}
