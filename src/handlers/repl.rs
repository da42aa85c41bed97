//! Line-based REPL: one problem per line, one round trip per problem.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::{
    execution::InferenceEngine,
    llm::CompletionClient,
    model::Problem,
    pipeline::{EngineContext, Orchestrator, RoundTrip, Stage},
    printer,
};

pub const EXIT_TOKENS: &[&str] = &["exit", "quit", "q"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Exit,
    Skip,
    Problem(Problem),
}

pub fn is_exit_token(line: &str) -> bool {
    let line = line.trim();
    EXIT_TOKENS.iter().any(|t| line.eq_ignore_ascii_case(t))
}

pub fn parse_input(line: &str) -> ReplInput {
    if is_exit_token(line) {
        return ReplInput::Exit;
    }
    match Problem::new(line) {
        Some(p) => ReplInput::Problem(p),
        None => ReplInput::Skip,
    }
}

/// Progress line shown when a stage starts; `None` for stages that run silently.
pub fn stage_message(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Generating => Some("Converting problem to Prolog..."),
        Stage::Executing => Some("Executing Prolog program..."),
        Stage::Interpreting => Some("Translating results to natural language..."),
        _ => None,
    }
}

/// Run one problem and print the result. Returns whether it was delivered.
pub async fn solve_and_print<C, E>(
    orchestrator: &Orchestrator<C>,
    ctx: &mut EngineContext<E>,
    problem: &Problem,
    markdown: bool,
) -> bool
where
    C: CompletionClient,
    E: InferenceEngine,
{
    let round = orchestrator
        .run_with(ctx, problem, |stage| {
            if let Some(msg) = stage_message(stage) {
                printer::status(msg);
            }
        })
        .await;

    match round {
        RoundTrip::Delivered { program, explanation, .. } => {
            printer::status(&format!("Prolog code saved to: {}", program.display()));
            if explanation.is_fallback() {
                printer::status("Showing raw Prolog output");
            }
            printer::solution(explanation.text(), markdown);
            true
        }
        RoundTrip::Aborted { stage, reason } => {
            printer::failure(&format!("{} ({})", reason, stage));
            printer::failure("Could not solve this problem. Try again.");
            println!();
            false
        }
    }
}

/// Solve one problem given up front. Piped input is taken whole as the
/// problem text, so exit tokens have no meaning here.
pub async fn one_shot<C, E>(
    orchestrator: &Orchestrator<C>,
    ctx: &mut EngineContext<E>,
    text: &str,
    markdown: bool,
) -> Result<bool>
where
    C: CompletionClient,
    E: InferenceEngine,
{
    let problem = Problem::new(text).context("problem text is empty")?;
    Ok(solve_and_print(orchestrator, ctx, &problem, markdown).await)
}

/// Read problems from `input` until an exit token or end of input.
pub async fn run<C, E, R>(
    orchestrator: &Orchestrator<C>,
    ctx: &mut EngineContext<E>,
    mut input: R,
    markdown: bool,
) -> Result<()>
where
    C: CompletionClient,
    E: InferenceEngine,
    R: BufRead,
{
    printer::banner();
    loop {
        println!("Enter a logic problem (or 'exit' to quit):");
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            println!("\nGoodbye!");
            break;
        }

        match parse_input(&line) {
            ReplInput::Exit => {
                println!("\nGoodbye!");
                break;
            }
            ReplInput::Skip => continue,
            ReplInput::Problem(problem) => {
                println!();
                solve_and_print(orchestrator, ctx, &problem, markdown).await;
            }
        }
    }
    Ok(())
}
