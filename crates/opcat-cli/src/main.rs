use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::Serialize;

use opcat_core::Operation;
use opcat_core::config::{self, CONFIG_FILE_NAME, OpcatConfig, OutputFormat};
use opcat_core::spec::{Spec, get_spec_sync};

#[derive(Parser)]
#[command(name = "opcat", about = "Swagger 2.0 operation catalog", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full operation catalog
    Operations {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long)]
        format: Option<Format>,
    },

    /// Print a one-entry-per-operation summary
    Inspect {
        /// Path to the spec file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long)]
        format: Option<Format>,
    },

    /// Check that every operation resolves
    Validate {
        /// Path to the spec file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new opcat configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => Format::Yaml,
            OutputFormat::Json => Format::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Operations { input, format } => cmd_operations(input, format),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "opcat", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OpcatConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

fn load_spec(path: &PathBuf) -> Result<Spec> {
    get_spec_sync(path.as_path()).with_context(|| format!("failed to load {}", path.display()))
}

fn load_operations(input: Option<PathBuf>, cfg: &OpcatConfig) -> Result<Vec<Operation>> {
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let spec = load_spec(&input)?;
    log::info!("loaded {} (basePath {})", input.display(), spec.base_path());
    let operations = spec
        .operations_with_options(&cfg.catalog_options())
        .with_context(|| format!("failed to resolve operations in {}", input.display()))?;
    Ok(operations)
}

fn print<T: Serialize>(value: &T, format: Format) -> Result<()> {
    match format {
        Format::Yaml => {
            let yaml = serde_yaml_ng::to_string(value)?;
            print!("{}", yaml);
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn cmd_operations(input: Option<PathBuf>, format: Option<Format>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let operations = load_operations(input, &cfg)?;
    print(&operations, format.unwrap_or(cfg.format.into()))
}

fn cmd_inspect(input: Option<PathBuf>, format: Option<Format>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let operations = load_operations(input, &cfg)?;
    let summary = build_inspect_summary(&operations);
    print(&summary, format.unwrap_or(cfg.format.into()))
}

fn build_inspect_summary(operations: &[Operation]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "id": op.id,
                "method": op.method.as_str(),
                "path": op.path,
                "fullPath": op.full_path,
                "parameterLocations": op
                    .param_group_schemas
                    .keys()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>(),
                "statuses": op.response_schemas.keys().collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "operations": entries,
    })
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let spec = load_spec(&input)?;
    let document = spec.document();

    if let Some(version) = document.get("swagger").and_then(|v| v.as_str()) {
        eprintln!("Swagger {} spec: {}", version, input.display());
    }
    eprintln!("  Base path: {}", spec.base_path());
    let paths = document
        .get("paths")
        .and_then(|p| p.as_object())
        .map_or(0, |p| p.len());
    eprintln!("  Paths: {}", paths);

    let cfg = try_load_config()?.unwrap_or_default();
    let operations = spec
        .operations_with_options(&cfg.catalog_options())
        .context("reference resolution failed")?;
    eprintln!("  Operations: {}", operations.len());

    let unnamed = operations.iter().filter(|op| op.id.is_none()).count();
    if unnamed > 0 {
        eprintln!("  Operations without operationId: {}", unnamed);
    }

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
