//! Failure taxonomy for a single round trip.

use std::path::PathBuf;

/// Errors from the completion service.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("completion service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {raw}")]
    MalformedResponse { raw: String },
}

/// Errors talking to the inference engine process itself.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start inference engine `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("inference engine i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("inference engine closed its output")]
    Closed,

    #[error("unexpected reply from inference engine: {0}")]
    Protocol(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("program generation failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("generated code is too short or empty ({len} characters)")]
    TooShort { len: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to save program to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("program rejected by inference engine: {diagnostic}")]
    Rejected { diagnostic: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Reasons a solution could not be queried. Never surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum QueryFailure {
    #[error("query produced no answers")]
    NoAnswers,

    #[error("query raised: {0}")]
    Exception(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Failure while translating the outcome back. Recovered locally.
#[derive(Debug, thiserror::Error)]
#[error("result interpretation failed: {0}")]
pub struct InterpretationFailure(#[from] pub CompletionError);
