//! Interpreter process management (startup/IO).

use std::process::Stdio;

use tempfile::NamedTempFile;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin, ChildStdout, Command},
};
use tracing::debug;

use crate::error::EngineError;

pub mod swipl;

/// A running interpreter with piped stdin/stdout.
pub struct ProcessHandle {
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    // Bootstrap script must outlive the process that loaded it.
    _script: Option<NamedTempFile>,
}

impl ProcessHandle {
    pub fn spawn(mut cmd: Command, script: Option<NamedTempFile>) -> Result<Self, EngineError> {
        let program = cmd.as_std().get_program().to_string_lossy().into_owned();
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|source| EngineError::Spawn { program, source })?;
        let stdin = child.stdin.take().ok_or(EngineError::Closed)?;
        let stdout = child.stdout.take().ok_or(EngineError::Closed)?;

        Ok(Self { _child: child, stdin, stdout: BufReader::new(stdout), _script: script })
    }

    pub async fn send_line(&mut self, line: &str) -> Result<(), EngineError> {
        debug!(request = line, "engine <-");
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Next line of output without its terminator; `None` at end of stream.
    pub async fn read_line(&mut self) -> Result<Option<String>, EngineError> {
        let mut buf = String::new();
        let n = self.stdout.read_line(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        let line = buf.trim_end_matches(&['\r', '\n'][..]).to_string();
        Ok(Some(line))
    }
}
