//! One round trip: problem -> program -> engine -> explanation.

use std::{fmt, path::PathBuf};

use tracing::{error, info, warn};

use crate::{
    config::Config,
    error::{GenerationError, LoadError, PersistError},
    execution::{ExecutionOutcome, InferenceEngine, InferenceExecutor},
    handlers::{generate::ProgramGenerator, interpret::ResultInterpreter},
    llm::{ChatOptions, CompletionClient},
    model::{Explanation, Problem},
    store::ProgramStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitProblem,
    Generating,
    Extracting,
    Persisting,
    Executing,
    Interpreting,
    Delivered,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::AwaitProblem => "await-problem",
            Stage::Generating => "generating",
            Stage::Extracting => "extracting",
            Stage::Persisting => "persisting",
            Stage::Executing => "executing",
            Stage::Interpreting => "interpreting",
            Stage::Delivered => "delivered",
            Stage::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Why a round stopped early.
#[derive(Debug, thiserror::Error)]
pub enum AbortReason {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

#[derive(Debug)]
pub enum RoundTrip {
    Delivered {
        program: PathBuf,
        outcome: ExecutionOutcome,
        explanation: Explanation,
    },
    Aborted {
        stage: Stage,
        reason: AbortReason,
    },
}

impl RoundTrip {
    pub fn stage(&self) -> Stage {
        match self {
            RoundTrip::Delivered { .. } => Stage::Delivered,
            RoundTrip::Aborted { .. } => Stage::Aborted,
        }
    }
}

/// Owns the engine for the whole process. Every program ever loaded stays in
/// its knowledge base, so predicates from earlier rounds can clash with later ones.
pub struct EngineContext<E> {
    engine: E,
    loaded: Vec<PathBuf>,
}

impl<E: InferenceEngine> EngineContext<E> {
    pub fn new(engine: E) -> Self {
        Self { engine, loaded: Vec::new() }
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Programs already consulted into the shared engine, oldest first.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}

pub struct Orchestrator<C> {
    client: C,
    generator: ProgramGenerator,
    executor: InferenceExecutor,
    interpreter: ResultInterpreter,
    store: ProgramStore,
}

impl<C: CompletionClient> Orchestrator<C> {
    pub fn new(
        client: C,
        generator: ProgramGenerator,
        executor: InferenceExecutor,
        interpreter: ResultInterpreter,
        store: ProgramStore,
    ) -> Self {
        Self { client, generator, executor, interpreter, store }
    }

    pub fn from_config(cfg: &Config, client: C, opts: ChatOptions) -> Self {
        Self::new(
            client,
            ProgramGenerator::from_config(cfg, opts.clone()),
            InferenceExecutor::from_config(cfg),
            ResultInterpreter::new(opts),
            ProgramStore::from_config(cfg),
        )
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &ProgramStore {
        &self.store
    }

    pub async fn run<E: InferenceEngine>(&self, ctx: &mut EngineContext<E>, problem: &Problem) -> RoundTrip {
        self.run_with(ctx, problem, |_| {}).await
    }

    /// Stages run strictly in order with no retry. `on_stage` sees each stage
    /// as it is entered, ending with `Delivered` or `Aborted`.
    pub async fn run_with<E, F>(&self, ctx: &mut EngineContext<E>, problem: &Problem, mut on_stage: F) -> RoundTrip
    where
        E: InferenceEngine,
        F: FnMut(Stage),
    {
        let abort = |stage: Stage, reason: AbortReason, on_stage: &mut F| {
            error!(%stage, error = %reason, "round aborted");
            on_stage(Stage::Aborted);
            RoundTrip::Aborted { stage, reason }
        };

        on_stage(Stage::Generating);
        let completion = match self.generator.request(&self.client, problem).await {
            Ok(text) => text,
            Err(e) => return abort(Stage::Generating, e.into(), &mut on_stage),
        };

        on_stage(Stage::Extracting);
        let program = match self.generator.extract(&completion, problem) {
            Ok(p) => p,
            Err(e) => return abort(Stage::Extracting, e.into(), &mut on_stage),
        };

        on_stage(Stage::Persisting);
        let path = match self.store.save(&program.code, program.created_at) {
            Ok(p) => p,
            Err(e) => return abort(Stage::Persisting, e.into(), &mut on_stage),
        };

        on_stage(Stage::Executing);
        if !ctx.loaded.is_empty() {
            warn!(
                earlier = ctx.loaded.len(),
                "engine already holds clauses from earlier programs"
            );
        }
        // Recorded before loading: a partial load still leaves clauses behind.
        ctx.loaded.push(path.clone());
        let outcome = match self.executor.execute(&mut ctx.engine, &path).await {
            Ok(o) => o,
            Err(e) => return abort(Stage::Executing, e.into(), &mut on_stage),
        };
        info!(outcome = ?outcome, "program executed");

        on_stage(Stage::Interpreting);
        let raw = outcome.render();
        let explanation = self.interpreter.explain(&self.client, &program.problem, &raw).await;

        on_stage(Stage::Delivered);
        RoundTrip::Delivered { program: path, outcome, explanation }
    }
}
