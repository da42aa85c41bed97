#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use nesy::{
    error::{CompletionError, LoadError, QueryFailure},
    execution::{BindingRecord, BindingValue, InferenceEngine, InferenceExecutor, LoadReport, LoadResult, QueryResult},
    handlers::{generate::ProgramGenerator, interpret::ResultInterpreter},
    llm::{ChatMessage, ChatOptions, CompletionClient},
    pipeline::Orchestrator,
    store::ProgramStore,
};

/// Completion client that replays canned replies in order.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self { replies: Mutex::new(replies.into()), seen: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, messages: &[ChatMessage], _opts: &ChatOptions) -> Result<String, CompletionError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::MalformedResponse { raw: "no scripted reply".into() }))
    }
}

pub fn service_down() -> CompletionError {
    CompletionError::Status { status: 503, body: "model not loaded".into() }
}

/// In-memory engine with a fixed load verdict and query answer.
pub struct FakeEngine {
    pub reject_load: Option<String>,
    pub answers: Result<Vec<BindingRecord>, String>,
    pub loads: Vec<PathBuf>,
    pub queries: Vec<(String, String)>,
}

impl FakeEngine {
    pub fn answering(answers: Vec<BindingRecord>) -> Self {
        Self { reject_load: None, answers: Ok(answers), loads: Vec::new(), queries: Vec::new() }
    }

    pub fn rejecting(diagnostic: &str) -> Self {
        Self { reject_load: Some(diagnostic.into()), ..Self::answering(Vec::new()) }
    }

    pub fn raising(message: &str) -> Self {
        Self { answers: Err(message.into()), ..Self::answering(Vec::new()) }
    }
}

#[async_trait]
impl InferenceEngine for FakeEngine {
    async fn load(&mut self, program: &Path) -> LoadResult {
        self.loads.push(program.to_path_buf());
        match &self.reject_load {
            Some(d) => Err(LoadError::Rejected { diagnostic: d.clone() }),
            None => Ok(LoadReport { output: "Solution:\n".into() }),
        }
    }

    async fn query(&mut self, goal: &str, variable: &str) -> QueryResult {
        self.queries.push((goal.to_string(), variable.to_string()));
        match &self.answers {
            Ok(a) => Ok(a.clone()),
            Err(m) => Err(QueryFailure::Exception(m.clone())),
        }
    }
}

pub fn term(s: &str) -> BindingValue {
    BindingValue::Term(s.to_string())
}

pub fn list(items: &[&str]) -> BindingValue {
    BindingValue::List(items.iter().map(|s| term(s)).collect())
}

pub fn binding(var: &str, value: BindingValue) -> BindingRecord {
    let mut r = BindingRecord::new();
    r.insert(var.to_string(), value);
    r
}

pub fn opts() -> ChatOptions {
    ChatOptions { model: "test-model".into(), temperature: 0.0 }
}

pub fn orchestrator(client: ScriptedClient, program_dir: &Path) -> Orchestrator<ScriptedClient> {
    Orchestrator::new(
        client,
        ProgramGenerator::new(opts()),
        InferenceExecutor::default(),
        ResultInterpreter::new(opts()),
        ProgramStore::new(program_dir),
    )
}

pub const COLORS_PROBLEM: &str = "Three people, three colors, each has a different favorite";

pub const COLORS_COMPLETION: &str = "Here is the program:\n\n```prolog\nsolve(Solution) :-\n    Solution = [person(alice, A), person(bob, B), person(carol, C)],\n    member(A, [red, green, blue]),\n    member(B, [red, green, blue]),\n    member(C, [red, green, blue]),\n    A \\= B, B \\= C, A \\= C.\n\n:- initialization(main).\nmain :- solve(S), writeln('Solution:'), writeln(S), halt.\n```\n\nThis enumerates every assignment.";
