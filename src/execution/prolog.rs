//! SWI-Prolog engine driven over stdin/stdout by the bundled driver script.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::{BindingRecord, InferenceEngine, LoadReport, LoadResult, QueryResult};
use crate::{
    config::Config,
    error::{EngineError, LoadError, QueryFailure},
    process::{swipl::start_swipl, ProcessHandle},
};

const DRIVER: &str = include_str!("driver.pl");
const REPLY_PREFIX: &str = "%nesy% ";

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Reply {
    Pong {
        version: u64,
    },
    Loaded {
        #[serde(default)]
        output: String,
    },
    LoadError {
        message: String,
        #[serde(default)]
        output: String,
    },
    Answers {
        bindings: Vec<BindingRecord>,
        #[serde(default)]
        output: String,
    },
    Exception {
        message: String,
    },
    Error {
        message: String,
    },
}

pub struct PrologEngine {
    process: ProcessHandle,
    max_answers: usize,
}

impl PrologEngine {
    pub fn start(program: &str, max_answers: usize) -> Result<Self, EngineError> {
        let process = start_swipl(program, DRIVER)?;
        info!(program, "inference engine started");
        Ok(Self { process, max_answers: max_answers.max(1) })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, EngineError> {
        let program = cfg.get("SWIPL_PATH").unwrap_or_else(|| "swipl".into());
        let max_answers = cfg.get_usize("MAX_ANSWERS").unwrap_or(10);
        Self::start(&program, max_answers)
    }

    /// Round-trip a trivial request; returns the engine's version number.
    pub async fn ping(&mut self) -> Result<u64, EngineError> {
        match self.request("ping.").await? {
            Reply::Pong { version } => Ok(version),
            other => Err(unexpected(other)),
        }
    }

    async fn request(&mut self, line: &str) -> Result<Reply, EngineError> {
        self.process.send_line(line).await?;
        loop {
            let line = self.process.read_line().await?.ok_or(EngineError::Closed)?;
            match split_reply(&line) {
                Some((stray, payload)) => {
                    if !stray.is_empty() {
                        debug!(line = stray, "stray engine output");
                    }
                    debug!(reply = payload, "engine ->");
                    return serde_json::from_str(payload)
                        .map_err(|e| EngineError::Protocol(format!("{}: {}", e, payload)));
                }
                // Output a program wrote straight to the terminal stream.
                None => debug!(line = %line, "stray engine output"),
            }
        }
    }
}

#[async_trait]
impl InferenceEngine for PrologEngine {
    async fn load(&mut self, program: &Path) -> LoadResult {
        // Prolog wants forward slashes even on Windows
        let path = program.to_string_lossy().replace('\\', "/");
        match self.request(&format!("consult({}).", quote_atom(&path))).await? {
            Reply::Loaded { output } => Ok(LoadReport { output }),
            Reply::LoadError { message, output } => {
                if !output.trim().is_empty() {
                    debug!(output = %output.trim_end(), "program output before load error");
                }
                Err(LoadError::Rejected { diagnostic: message.trim().to_string() })
            }
            Reply::Error { message } => Err(LoadError::Rejected { diagnostic: message.trim().to_string() }),
            other => Err(unexpected(other).into()),
        }
    }

    async fn query(&mut self, goal: &str, variable: &str) -> QueryResult {
        let request = format!(
            "query({}, {}, {}).",
            quote_string(goal),
            quote_string(variable),
            self.max_answers
        );
        match self.request(&request).await? {
            Reply::Answers { bindings, output } => {
                if !output.trim().is_empty() {
                    debug!(output = %output.trim_end(), "program output during query");
                }
                Ok(bindings)
            }
            Reply::Exception { message } | Reply::Error { message } => {
                Err(QueryFailure::Exception(message.trim().to_string()))
            }
            other => Err(unexpected(other).into()),
        }
    }
}

/// Split a line into program output and reply payload. A program that writes
/// without a trailing newline leaves its text in front of the prefix.
fn split_reply(line: &str) -> Option<(&str, &str)> {
    let at = line.find(REPLY_PREFIX)?;
    Some((&line[..at], &line[at + REPLY_PREFIX.len()..]))
}

fn unexpected(reply: Reply) -> EngineError {
    EngineError::Protocol(format!("{:?}", reply))
}

/// Single-quoted Prolog atom.
pub fn quote_atom(s: &str) -> String {
    format!("'{}'", escape(s, '\''))
}

/// Double-quoted Prolog string.
pub fn quote_string(s: &str) -> String {
    format!("\"{}\"", escape(s, '"'))
}

fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
