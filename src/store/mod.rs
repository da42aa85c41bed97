//! Persistence of generated programs: one file per round trip, never overwritten.

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use tracing::info;

use crate::{config::Config, error::PersistError};

pub const PROGRAM_EXT: &str = "pl";

#[derive(Debug, Clone)]
pub struct ProgramStore {
    dir: PathBuf,
}

impl ProgramStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.program_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `code` as `problem_<timestamp>.pl`. A same-second collision gets a
    /// numeric suffix rather than replacing the earlier file.
    pub fn save(&self, code: &str, created_at: DateTime<Local>) -> Result<PathBuf, PersistError> {
        let io_err = |path: &Path, source| PersistError::Io { path: path.to_path_buf(), source };
        fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;

        let stamp = created_at.format("%Y%m%d_%H%M%S").to_string();
        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("problem_{}.{}", stamp, PROGRAM_EXT)
            } else {
                format!("problem_{}_{}.{}", stamp, attempt, PROGRAM_EXT)
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(code.as_bytes()).map_err(|e| io_err(&path, e))?;
                    info!(path = %path.display(), "program saved");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(io_err(&path, e)),
            }
        }
    }

    /// Saved programs, oldest first.
    pub fn list(&self) -> Vec<PathBuf> {
        if let Ok(read_dir) = fs::read_dir(&self.dir) {
            let mut files: Vec<PathBuf> = read_dir
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(PROGRAM_EXT))
                .collect();
            files.sort();
            files
        } else {
            Vec::new()
        }
    }
}
