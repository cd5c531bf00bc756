use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::ai::{AIConfig, AIFactory, TriageError, TriageOutcome, TriageService};
use crate::email::load_email_file;

/// Triagem - classify emails and suggest replies
#[derive(Parser)]
#[command(name = "triagem")]
#[command(about = "Classify emails as productive or unproductive and suggest a reply")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Triage a single email
    Classify(ClassifyArgs),

    /// Triage a JSON list of emails
    Batch(BatchArgs),

    /// Show service health
    Health,

    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// Email text; read from stdin when neither TEXT nor --file is given
    pub text: Option<String>,

    /// Read the email from a .txt file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// JSON file with an array of emails or an {"emails": [...]} object
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Print the API key unmasked
    #[arg(long)]
    pub show_key: bool,
}

/// Accepted batch file layouts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    List(Vec<String>),
    Wrapped { emails: Vec<String> },
}

impl BatchFile {
    fn into_emails(self) -> Vec<String> {
        match self {
            BatchFile::List(emails) | BatchFile::Wrapped { emails } => emails,
        }
    }
}

/// Parse the contents of a batch file
pub fn parse_batch_file(content: &str) -> Result<Vec<String>> {
    let batch: BatchFile = serde_json::from_str(content).map_err(|e| {
        anyhow!(
            "Batch file must be a JSON array of strings or an object with an \"emails\" array: {}",
            e
        )
    })?;
    Ok(batch.into_emails())
}

/// Default configuration file location
pub fn default_config_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow!("Cannot find config directory"))?
        .join("triagem")
        .join("config.toml"))
}

/// CLI command handler
pub struct CliHandler {
    config: AIConfig,
    config_path: PathBuf,
    service: TriageService,
}

impl CliHandler {
    /// Load configuration from file and environment, then build the service
    pub async fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => default_config_path()?,
        };

        let mut config = AIConfig::load_from_file(&config_path)
            .await
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        config.apply_env_overrides(|name| std::env::var(name).ok());

        tracing::debug!("Loaded configuration from {}", config_path.display());
        Ok(Self::with_config(config, config_path))
    }

    /// Handler over an already-resolved configuration
    pub fn with_config(config: AIConfig, config_path: PathBuf) -> Self {
        let service = AIFactory::create_triage_service(&config);
        Self {
            config,
            config_path,
            service,
        }
    }

    pub fn service(&self) -> &TriageService {
        &self.service
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Classify(args) => self.handle_classify(args).await,
            Commands::Batch(args) => self.handle_batch(args).await,
            Commands::Health => self.handle_health(),
            Commands::Config(args) => self.handle_config(args),
        }
    }

    async fn read_email(&self, args: &ClassifyArgs) -> Result<String> {
        if let Some(ref text) = args.text {
            return Ok(text.clone());
        }

        if let Some(ref path) = args.file {
            return Ok(load_email_file(path).await?);
        }

        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("Failed to read email from stdin")?;
        Ok(input)
    }

    async fn handle_classify(&self, args: ClassifyArgs) -> Result<()> {
        let email = self.read_email(&args).await?;
        let outcome = self.service.triage(&email).await?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print_outcome(&outcome);
        }
        Ok(())
    }

    async fn handle_batch(&self, args: BatchArgs) -> Result<()> {
        let content = tokio::fs::read_to_string(&args.path)
            .await
            .with_context(|| format!("Failed to read {}", args.path.display()))?;
        let emails = parse_batch_file(&content)?;

        if emails.is_empty() {
            return Err(TriageError::invalid_input("lista de emails vazia").into());
        }

        tracing::info!("Triaging {} emails from {}", emails.len(), args.path.display());
        let results = self.service.triage_batch(&emails).await;
        println!("{}", serde_json::to_string_pretty(&results)?);
        Ok(())
    }

    fn handle_health(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&self.service.health())?);
        Ok(())
    }

    fn handle_config(&self, args: ConfigArgs) -> Result<()> {
        let shown = if args.show_key {
            self.config.clone()
        } else {
            self.config.redacted()
        };

        println!("# {}", self.config_path.display());
        println!("{}", toml::to_string_pretty(&shown)?);
        println!(
            "# backend: {}",
            if self.config.backend_selection().is_model_backend() {
                "model"
            } else {
                "rules"
            }
        );
        Ok(())
    }
}

fn print_outcome(outcome: &TriageOutcome) {
    println!("📧 Categoria:   {}", outcome.category);
    println!("🎯 Confiança:   {:.2} ({:?})", outcome.confidence, outcome.method);
    println!("⏱️  Tempo:       {:.3}s", outcome.processing_time);
    println!();
    println!("💬 Resposta sugerida:");
    println!("{}", outcome.suggested_response);
}

/// Exit code for an error surfaced by a command
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<TriageError>() {
        Some(e) if e.is_input_error() => 2,
        _ => 1,
    }
}
