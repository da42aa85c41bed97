//! Inference engine protocol, result types and the load-then-query executor.

use std::{collections::BTreeMap, fmt, path::Path};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{LoadError, QueryFailure},
};

pub mod prolog;

/// A value bound to a query variable. Lists keep their structure so they can be
/// expanded element by element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingValue {
    List(Vec<BindingValue>),
    Term(String),
}

impl fmt::Display for BindingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingValue::Term(t) => f.write_str(t),
            BindingValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Variable name to value, one per answer.
pub type BindingRecord = BTreeMap<String, BindingValue>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Text the program printed while loading (initialization goals).
    pub output: String,
}

pub type LoadResult = Result<LoadReport, LoadError>;
pub type QueryResult = Result<Vec<BindingRecord>, QueryFailure>;

/// A logic engine whose knowledge base grows with every load and is never unloaded.
#[async_trait]
pub trait InferenceEngine: Send {
    async fn load(&mut self, program: &Path) -> LoadResult;

    /// Answers in engine order; an empty vector when there are none.
    async fn query(&mut self, goal: &str, variable: &str) -> QueryResult;
}

/// Shown when the program loaded but no solution binding came back.
pub const NO_SOLUTION_TEXT: &str =
    "Program consulted successfully, but the solution query returned no bound solution.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Solved { lines: Vec<String> },
    NoSolution,
}

impl ExecutionOutcome {
    pub fn render(&self) -> String {
        match self {
            ExecutionOutcome::Solved { lines } => lines.join("\n"),
            ExecutionOutcome::NoSolution => NO_SOLUTION_TEXT.to_string(),
        }
    }

    /// Lines for one variable of the first answer. Lists expand to one line per element.
    pub fn from_answers(answers: &[BindingRecord], variable: &str) -> Result<Self, QueryFailure> {
        let first = answers.first().ok_or(QueryFailure::NoAnswers)?;
        let lines = match first.get(variable) {
            Some(BindingValue::List(items)) => items.iter().map(|i| i.to_string()).collect(),
            Some(value) => vec![value.to_string()],
            None => Vec::new(),
        };
        if lines.is_empty() {
            return Err(QueryFailure::NoAnswers);
        }
        Ok(ExecutionOutcome::Solved { lines })
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Loads a program and queries its solution predicate.
#[derive(Debug, Clone)]
pub struct InferenceExecutor {
    goal: String,
    variable: String,
}

impl Default for InferenceExecutor {
    fn default() -> Self {
        Self::new("solve(Solution)", "Solution")
    }
}

impl InferenceExecutor {
    pub fn new(goal: impl Into<String>, variable: impl Into<String>) -> Self {
        Self { goal: goal.into(), variable: variable.into() }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let default = Self::default();
        Self {
            goal: cfg.get("SOLUTION_GOAL").unwrap_or(default.goal),
            variable: cfg.get("SOLUTION_VARIABLE").unwrap_or(default.variable),
        }
    }

    /// A load failure is returned as-is and no query is made. Every query
    /// failure becomes [`ExecutionOutcome::NoSolution`].
    pub async fn execute<E>(&self, engine: &mut E, program: &Path) -> Result<ExecutionOutcome, LoadError>
    where
        E: InferenceEngine + ?Sized,
    {
        let report = engine.load(program).await?;
        if !report.output.trim().is_empty() {
            debug!(output = %report.output.trim_end(), "program output during load");
        }

        let answers = engine.query(&self.goal, &self.variable).await;
        match answers.and_then(|a| ExecutionOutcome::from_answers(&a, &self.variable)) {
            Ok(outcome) => Ok(outcome),
            Err(QueryFailure::NoAnswers) => {
                debug!(goal = %self.goal, "no answers");
                Ok(ExecutionOutcome::NoSolution)
            }
            Err(e) => {
                warn!(goal = %self.goal, error = %e, "could not query solution");
                Ok(ExecutionOutcome::NoSolution)
            }
        }
    }
}
