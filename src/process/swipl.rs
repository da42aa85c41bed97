//! SWI-Prolog process bootstrap.

use std::io::Write;

use tokio::process::Command;

use super::ProcessHandle;
use crate::error::EngineError;

/// Entry goal defined by the driver script.
pub const SERVE_GOAL: &str = "nesy_serve";

/// Start `program` (normally `swipl`) running `driver` as a request loop.
pub fn start_swipl(program: &str, driver: &str) -> Result<ProcessHandle, EngineError> {
    let mut script = tempfile::Builder::new()
        .prefix("nesy_driver_")
        .suffix(".pl")
        .tempfile()?;
    script.write_all(driver.as_bytes())?;
    script.flush()?;

    let mut cmd = Command::new(program);
    cmd.arg("-q")
        .args(["-f", "none"])
        .args(["-g", SERVE_GOAL])
        .args(["-t", "halt"])
        .arg(script.path());

    ProcessHandle::spawn(cmd, Some(script))
}
