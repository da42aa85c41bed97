//! Problem to program: render the generation template, ask the model, extract the code.

use tracing::{debug, info};

use crate::{
    config::Config,
    error::GenerationError,
    extract::extract_program,
    llm::{ChatOptions, CompletionClient},
    model::{GeneratedProgram, Problem},
    templates::{generation_messages, LANGUAGE_TAG},
};

pub const MIN_PROGRAM_LENGTH: usize = 20;

pub type GenerationResult = Result<GeneratedProgram, GenerationError>;

#[derive(Debug, Clone)]
pub struct ProgramGenerator {
    opts: ChatOptions,
    min_len: usize,
}

impl ProgramGenerator {
    pub fn new(opts: ChatOptions) -> Self {
        Self { opts, min_len: MIN_PROGRAM_LENGTH }
    }

    pub fn from_config(cfg: &Config, opts: ChatOptions) -> Self {
        Self {
            opts,
            min_len: cfg.get_usize("MIN_PROGRAM_LENGTH").unwrap_or(MIN_PROGRAM_LENGTH),
        }
    }

    /// Completion text only; no extraction.
    pub async fn request<C>(&self, client: &C, problem: &Problem) -> Result<String, GenerationError>
    where
        C: CompletionClient + ?Sized,
    {
        let messages = generation_messages(problem.text());
        let text = client.complete(&messages, &self.opts).await?;
        debug!(chars = text.len(), "generation completion received");
        Ok(text)
    }

    pub fn extract(&self, completion: &str, problem: &Problem) -> GenerationResult {
        let code = extract_program(completion, LANGUAGE_TAG, self.min_len)?;
        info!(chars = code.chars().count(), "program extracted");
        Ok(GeneratedProgram::new(code, problem.clone()))
    }

}
