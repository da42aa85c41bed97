//! Values that flow through one round trip.

use chrono::{DateTime, Local};

/// Natural-language puzzle text. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem(String);

impl Problem {
    /// Trimmed problem text, or `None` for blank input.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self(text.to_string()))
        }
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedProgram {
    pub code: String,
    pub problem: Problem,
    pub created_at: DateTime<Local>,
}

impl GeneratedProgram {
    pub fn new(code: String, problem: Problem) -> Self {
        Self { code, problem, created_at: Local::now() }
    }
}

/// What the user finally sees for a delivered round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    Explained(String),
    /// Interpretation failed; the raw outcome text, unchanged.
    Raw(String),
}

impl Explanation {
    pub fn text(&self) -> &str {
        match self {
            Explanation::Explained(t) | Explanation::Raw(t) => t,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Explanation::Raw(_))
    }
}
