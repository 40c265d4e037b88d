use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemascribe_catalog::{capture, DatabaseConnection, MockConnection};
use schemascribe_core::{CompareControl, Config, ObjectKind, SnapshotFilter};
use schemascribe_engine::{generate, GenerateArgs};

/// SchemaScribe - changelog generation from database structure
#[derive(Parser)]
#[command(name = "schemascribe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemascribe.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a changelog that recreates the reference database
    Generate {
        /// Changelog file to write; .sql selects script format, anything
        /// else is declarative JSON. Omit to print JSON to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Change-set author
        #[arg(short, long)]
        author: Option<String>,

        /// Change-set context
        #[arg(long)]
        context: Option<String>,

        /// Object categories to include (e.g. tables,indexes)
        #[arg(short, long, value_delimiter = ',')]
        types: Vec<String>,

        /// Schemas to capture (overrides config)
        #[arg(short, long, value_delimiter = ',')]
        schemas: Vec<String>,

        /// JSON fixture describing the reference database (overrides config)
        #[arg(short, long)]
        fixture: Option<PathBuf>,
    },

    /// Capture a structural snapshot and print it as JSON
    Snapshot {
        /// Output file for the snapshot (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Object categories to include (e.g. tables,indexes)
        #[arg(short, long, value_delimiter = ',')]
        types: Vec<String>,

        /// Schemas to capture (overrides config)
        #[arg(short, long, value_delimiter = ',')]
        schemas: Vec<String>,

        /// JSON fixture describing the reference database (overrides config)
        #[arg(short, long)]
        fixture: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("schemascribe.toml").exists() {
        Config::from_file(Path::new("schemascribe.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    match cli.command {
        Commands::Generate {
            output,
            author,
            context,
            types,
            schemas,
            fixture,
        } => {
            generate_command(
                &config,
                output.as_deref(),
                author,
                context,
                &types,
                &schemas,
                fixture.as_deref(),
                cli.verbose,
            )
            .await
        }
        Commands::Snapshot {
            output,
            types,
            schemas,
            fixture,
        } => {
            snapshot_command(
                &config,
                output.as_deref(),
                &types,
                &schemas,
                fixture.as_deref(),
                cli.verbose,
            )
            .await
        }
    }
}

/// Generate command - diff the reference against an empty baseline
#[allow(clippy::too_many_arguments)]
async fn generate_command(
    config: &Config,
    output: Option<&Path>,
    author: Option<String>,
    context: Option<String>,
    types: &[String],
    schemas: &[String],
    fixture: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let connection = open_connection(config, fixture, verbose)?;
    let schema_scope = resolve_schemas(config, schemas);
    let snapshot_types = parse_types(types)?;

    let author = author.or_else(|| config.author.clone());
    let context = context.or_else(|| config.context.clone());

    if verbose {
        eprintln!(
            "{} {} schema(s) from {}",
            "Capturing".cyan(),
            schema_scope.len(),
            connection.name()
        );
    }

    let summary = generate(GenerateArgs {
        reference: connection.as_ref(),
        changelog_path: output.map(|p| p.display().to_string()),
        output: None,
        author,
        context,
        snapshot_types,
        compare_control: CompareControl::for_schemas(schema_scope),
        advisory_sink: Some(Box::new(|msg| {
            eprintln!("{} {}", "Note:".yellow().bold(), msg);
        })),
    })
    .await
    .map_err(|e| anyhow::anyhow!("changelog generation failed: {}", e))?;

    // stdout may be the changelog itself; all human messaging goes to stderr
    eprintln!();
    eprintln!("{} {}", "Generated".green().bold(), summary_line(&summary));
    if let Some(path) = output {
        eprintln!("{} {}", "Changelog saved to:".green(), path.display());
    }

    Ok(())
}

/// Human-readable one-line outcome of a generation run
fn summary_line(summary: &schemascribe_engine::GenerateSummary) -> String {
    format!(
        "{} change set(s), {:?} format",
        summary.change_sets, summary.format
    )
}

/// Snapshot command - capture structure without generating a changelog
async fn snapshot_command(
    config: &Config,
    output: Option<&Path>,
    types: &[String],
    schemas: &[String],
    fixture: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let connection = open_connection(config, fixture, verbose)?;
    let schema_scope = resolve_schemas(config, schemas);
    if schema_scope.is_empty() {
        return Err(anyhow::anyhow!(
            "No schemas given. Pass --schemas or set schemas in the [connection] config section."
        ));
    }
    let filter = parse_types(types)?.unwrap_or_default();

    let snapshot = capture(connection.as_ref(), &schema_scope, &filter)
        .await
        .map_err(|e| anyhow::anyhow!("snapshot capture failed: {}", e))?;

    let json = serde_json::to_string_pretty(&snapshot)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            if verbose {
                eprintln!("{} {}", "Snapshot saved to:".green(), path.display());
            }
        }
        None => println!("{}", json),
    }

    eprintln!(
        "{} {} object(s) across {} schema(s)",
        "Captured".green().bold(),
        snapshot.object_count(),
        snapshot.schemas().len()
    );

    Ok(())
}

/// Build the reference connection from --fixture or the [connection] config
fn open_connection(
    config: &Config,
    fixture: Option<&Path>,
    verbose: bool,
) -> Result<Box<dyn DatabaseConnection>> {
    let fixture_path = match fixture {
        Some(path) => path.to_path_buf(),
        None => {
            let conn = config.connection.as_ref().ok_or_else(|| {
                anyhow::anyhow!(
                    "No reference connection configured. Pass --fixture or add a \
                     [connection] section to schemascribe.toml."
                )
            })?;
            match conn.connection_type.to_lowercase().as_str() {
                "fixture" => conn
                    .settings
                    .get("path")
                    .map(PathBuf::from)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Fixture connection requires 'path' in connection settings")
                    })?,
                other => {
                    return Err(anyhow::anyhow!(
                        "Unsupported connection type '{}'. Supported: fixture",
                        other
                    ));
                }
            }
        }
    };

    if verbose {
        eprintln!("{} {}", "Loading fixture from:".cyan(), fixture_path.display());
    }

    let json = std::fs::read_to_string(&fixture_path).map_err(|e| {
        anyhow::anyhow!("Failed to read fixture {}: {}", fixture_path.display(), e)
    })?;
    let connection = MockConnection::from_fixture_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to load fixture: {}", e))?;

    Ok(Box::new(connection))
}

/// Schema scope from the command line, falling back to config
fn resolve_schemas(config: &Config, schemas: &[String]) -> Vec<String> {
    if !schemas.is_empty() {
        return schemas.to_vec();
    }
    config
        .connection
        .as_ref()
        .map(|c| c.schemas.clone())
        .unwrap_or_default()
}

/// Parse --types values into a capture filter; empty means all categories
fn parse_types(types: &[String]) -> Result<Option<SnapshotFilter>> {
    if types.is_empty() {
        return Ok(None);
    }
    let kinds = types
        .iter()
        .map(|t| t.parse::<ObjectKind>().map_err(|e| anyhow::anyhow!(e)))
        .collect::<Result<Vec<ObjectKind>>>()?;
    Ok(Some(SnapshotFilter::only(kinds)))
}
