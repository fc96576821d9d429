use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use stadtland_core::{JudgeConfig, JudgeProvider, RoundResult};

#[derive(Parser)]
#[command(
    name = "stadtland",
    version,
    about = "Round evaluation for Stadt, Land, Fluss: block-word vetoes, LLM judge, tie-aware scores"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate one round from a JSON file (or stdin) and print the result table
    Evaluate(EvaluateArgs),
    /// Serve the evaluation and lobby HTTP API
    Serve(ServeArgs),
    /// Print the version
    Version,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Clone, Debug)]
pub struct EvaluateArgs {
    /// Round JSON ({letter, categories, answers}); "-" reads stdin
    #[arg(long, default_value = "-")]
    pub round: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3001", env = "STADTLAND_BIND")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

/// Judge selection. Unset flags fall back to the config file, then to the
/// STADTLAND_JUDGE_* environment variables.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct JudgeArgs {
    /// YAML file with judge settings (provider, model, api_key, base_url, timeout_ms, retry_delay_ms)
    #[arg(long)]
    pub judge_config: Option<PathBuf>,

    /// Judge provider
    /// - gemini: Google Gemini (GEMINI_API_KEY)
    /// - openai: OpenAI chat completions (OPENAI_API_KEY)
    /// - fake: offline judge, accepts any answer with the right first letter
    #[arg(long)]
    pub judge: Option<String>,

    /// Judge model identifier (provider-specific)
    #[arg(long)]
    pub judge_model: Option<String>,

    /// Base URL of the judge API
    #[arg(long)]
    pub judge_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long)]
    pub judge_timeout_ms: Option<u64>,

    /// Pause before the single retry, in milliseconds
    #[arg(long)]
    pub judge_retry_delay_ms: Option<u64>,

    #[arg(long, hide = true)]
    pub judge_api_key: Option<String>,
}

impl JudgeArgs {
    pub fn to_config(&self) -> RoundResult<JudgeConfig> {
        let mut config = match &self.judge_config {
            Some(path) => JudgeConfig::from_yaml_file(path)?,
            None => JudgeConfig::from_env()?,
        };

        if let Some(provider) = &self.judge {
            let provider: JudgeProvider = provider.parse()?;
            if provider != config.provider {
                // Settings read for another provider do not carry over.
                config = JudgeConfig {
                    provider,
                    api_key: provider
                        .api_key_var()
                        .and_then(|v| std::env::var(v).ok())
                        .filter(|k| !k.trim().is_empty()),
                    model: None,
                    base_url: None,
                    ..config
                };
            }
        }
        if let Some(model) = &self.judge_model {
            config = config.with_model(model.clone());
        }
        if let Some(url) = &self.judge_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(ms) = self.judge_timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.judge_retry_delay_ms {
            config = config.with_retry_delay(Duration::from_millis(ms));
        }
        if let Some(key) = &self.judge_api_key {
            config = config.with_api_key(key.clone());
        }
        Ok(config)
    }
}
