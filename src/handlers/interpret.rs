//! Outcome back to prose, falling back to the raw outcome text.

use tracing::warn;

use crate::{
    error::{CompletionError, InterpretationFailure},
    llm::{ChatOptions, CompletionClient},
    model::{Explanation, Problem},
    templates::interpretation_messages,
};

pub type InterpretationResult = Result<String, InterpretationFailure>;

#[derive(Debug, Clone)]
pub struct ResultInterpreter {
    opts: ChatOptions,
}

impl ResultInterpreter {
    pub fn new(opts: ChatOptions) -> Self {
        Self { opts }
    }

    pub async fn interpret<C>(&self, client: &C, problem: &Problem, raw: &str) -> InterpretationResult
    where
        C: CompletionClient + ?Sized,
    {
        let messages = interpretation_messages(problem.text(), raw);
        let text = client.complete(&messages, &self.opts).await?;
        if text.trim().is_empty() {
            return Err(CompletionError::MalformedResponse { raw: text }.into());
        }
        Ok(text)
    }

    /// Never fails: any interpretation error yields `raw` byte-for-byte.
    pub async fn explain<C>(&self, client: &C, problem: &Problem, raw: &str) -> Explanation
    where
        C: CompletionClient + ?Sized,
    {
        match self.interpret(client, problem, raw).await {
            Ok(text) => Explanation::Explained(text),
            Err(e) => {
                warn!(error = %e, "showing raw Prolog output instead");
                Explanation::Raw(raw.to_string())
            }
        }
    }
}
