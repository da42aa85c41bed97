mod common;

use std::io::Cursor;

use common::*;
use nesy::{
    handlers::repl::{self, is_exit_token, parse_input, stage_message, ReplInput},
    model::Problem,
    pipeline::{EngineContext, Stage},
};

#[test]
fn exit_tokens_are_case_insensitive() {
    for token in ["exit", "Exit", "QUIT", "quit", "q", "Q", "  q  \n"] {
        assert!(is_exit_token(token), "{:?}", token);
        assert_eq!(parse_input(token), ReplInput::Exit);
    }
}

#[test]
fn empty_lines_are_skipped_not_exits() {
    for line in ["", "\n", "   \t\n"] {
        assert!(!is_exit_token(line));
        assert_eq!(parse_input(line), ReplInput::Skip);
    }
}

#[test]
fn other_text_is_a_problem() {
    assert_eq!(
        parse_input("  quite a puzzle\n"),
        ReplInput::Problem(Problem::new("quite a puzzle").unwrap())
    );
    assert!(matches!(parse_input("exit now"), ReplInput::Problem(_)));
}

#[test]
fn silent_stages_have_no_message() {
    assert!(stage_message(Stage::Generating).is_some());
    assert!(stage_message(Stage::Executing).is_some());
    assert!(stage_message(Stage::Interpreting).is_some());
    assert!(stage_message(Stage::Extracting).is_none());
    assert!(stage_message(Stage::Delivered).is_none());
}

#[tokio::test]
async fn loop_runs_problems_until_exit_token() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![Ok(COLORS_COMPLETION.into()), Ok("Done.".into())]);
    let orch = orchestrator(client, dir.path());
    let mut ctx = EngineContext::new(FakeEngine::answering(vec![binding("Solution", term("x"))]));

    let input = Cursor::new(format!("\n{}\n\nQUIT\n{}\n", COLORS_PROBLEM, COLORS_PROBLEM));
    repl::run(&orch, &mut ctx, input, false).await.unwrap();

    // One problem before QUIT; the one after is never read.
    assert_eq!(ctx.loaded().len(), 1);
    assert_eq!(orch.client().calls().len(), 2);
}

#[tokio::test]
async fn loop_ends_at_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(ScriptedClient::new(Vec::new()), dir.path());
    let mut ctx = EngineContext::new(FakeEngine::answering(Vec::new()));

    repl::run(&orch, &mut ctx, Cursor::new("\n\n"), false).await.unwrap();
    assert!(orch.client().calls().is_empty());
}

#[tokio::test]
async fn one_shot_takes_piped_text_as_a_problem() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(ScriptedClient::new(vec![Ok("too short".into())]), dir.path());
    let mut ctx = EngineContext::new(FakeEngine::answering(Vec::new()));

    // "q" is not an exit token outside the REPL; the round runs and aborts.
    assert!(!repl::one_shot(&orch, &mut ctx, "q\n", false).await.unwrap());
    assert_eq!(orch.client().calls().len(), 1);
}

#[tokio::test]
async fn one_shot_delivers_and_rejects_blank_text() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![Ok(COLORS_COMPLETION.into()), Ok("Done.".into())]);
    let orch = orchestrator(client, dir.path());
    let mut ctx = EngineContext::new(FakeEngine::answering(vec![binding("Solution", term("x"))]));

    assert!(repl::one_shot(&orch, &mut ctx, COLORS_PROBLEM, false).await.unwrap());
    assert!(repl::one_shot(&orch, &mut ctx, "  \n", false).await.is_err());
    assert_eq!(ctx.loaded().len(), 1);
}
