mod cli;

use std::{
    io::{self, Read},
    process::ExitCode,
};

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nesy::{
    config::Config,
    execution::prolog::PrologEngine,
    handlers::repl,
    llm::{ChatOptions, LlmClient},
    pipeline::{EngineContext, Orchestrator},
    printer,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();

    let mut cfg = Config::load();
    if let Some(m) = &args.model {
        cfg.set("DEFAULT_MODEL", m.as_str());
    }
    if let Some(url) = &args.api_base_url {
        cfg.set("API_BASE_URL", url.as_str());
    }
    if let Some(t) = args.temperature {
        cfg.set("TEMPERATURE", t.to_string());
    }
    if let Some(dir) = &args.program_dir {
        cfg.set("PROGRAM_DIR", dir.as_str());
    }
    if let Some(swipl) = &args.swipl {
        cfg.set("SWIPL_PATH", swipl.as_str());
    }

    init_tracing(&cfg);

    let stdout_tty = io::stdout().is_terminal();
    let markdown = if args.no_md {
        false
    } else if args.md {
        true
    } else {
        cfg.get_bool("PRETTIFY_MARKDOWN") && stdout_tty
    };

    // Start-up checks: both services must answer before any problem is read.
    printer::status("Checking Prolog availability...");
    let mut engine = PrologEngine::from_config(&cfg)
        .context("cannot start SWI-Prolog; ensure SWI-Prolog 9.0+ is installed and in your PATH")?;
    let version = engine
        .ping()
        .await
        .context("SWI-Prolog did not answer; ensure SWI-Prolog 9.0+ is installed")?;
    info!(version, "prolog engine ready");
    printer::status("Prolog engine initialized successfully");

    let model = cfg.model();
    let client = LlmClient::from_config(&cfg)?;
    printer::status("Checking completion service availability...");
    let models = client
        .list_models()
        .await
        .with_context(|| format!("cannot reach completion service at {}", client.base_url()))?;
    printer::status("Completion service is running");
    if !args.skip_model_check {
        check_model(&model, &models);
    }

    let opts = ChatOptions {
        model,
        temperature: cfg.get_f32("TEMPERATURE").unwrap_or(0.0),
    };
    let orchestrator = Orchestrator::from_config(&cfg, client, opts);
    let mut ctx = EngineContext::new(engine);

    // One-shot: positional problem, or all of piped stdin as a single problem
    let mut one_shot = args.problem.clone();
    if one_shot.is_none() && !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        one_shot = Some(buf);
    }

    match one_shot {
        Some(text) => {
            if repl::one_shot(&orchestrator, &mut ctx, &text, markdown).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        None => {
            println!();
            let stdin = io::stdin();
            repl::run(&orchestrator, &mut ctx, stdin.lock(), markdown).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(cfg.get("LOG_LEVEL").unwrap_or_else(|| "warn".into()))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn check_model(model: &str, available: &[String]) {
    if available.is_empty() {
        printer::status("Could not retrieve model list, but the service is running");
    } else if !available.iter().any(|name| name.contains(model)) {
        warn!(model, "configured model not listed by the service");
        printer::status(&format!("Model {} may not be installed", model));
        printer::status(&format!("Available models: {}", available.join(", ")));
    }
}
