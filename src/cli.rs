use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "nesy", about = "Solve logic puzzles with an LLM and SWI-Prolog", version)]
pub struct Cli {
    /// Solve a single problem and exit instead of starting the REPL.
    ///
    /// Without it, piped stdin is read whole as one problem; exit tokens like
    /// `q` are only recognised in the interactive REPL.
    #[arg(value_name = "PROBLEM")]
    pub problem: Option<String>,

    /// Model served by the completion endpoint.
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible completion service.
    #[arg(long = "api-base-url")]
    pub api_base_url: Option<String>,

    /// Sampling temperature.
    #[arg(long, value_parser = clap::value_parser!(f32))]
    pub temperature: Option<f32>,

    /// Directory generated programs are saved in.
    #[arg(long = "program-dir")]
    pub program_dir: Option<String>,

    /// SWI-Prolog executable.
    #[arg(long)]
    pub swipl: Option<String>,

    /// Render explanations as Markdown.
    #[arg(long, conflicts_with = "no_md")]
    pub md: bool,
    /// Print explanations as plain text.
    #[arg(long = "no-md")]
    pub no_md: bool,

    /// Skip the model availability check at start-up.
    #[arg(long = "skip-model-check")]
    pub skip_model_check: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
