//! docledger CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use docledger::{
    commands::{
        cmd_check, cmd_init, cmd_log, cmd_provision, cmd_record, cmd_show, cmd_status,
        print_check, print_document_report, print_status, InitOptions, RecordOptions,
    },
    config::{Config, DATABASE_URL_ENV},
    db::SchemaStore,
    error::Result,
    records::RecordRepository,
};
use std::error::Error as _;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "docledger")]
#[command(version, about = "Document-processing ledger on MySQL", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database URL or connection string (overrides the config file)
    #[arg(long, global = true, env = DATABASE_URL_ENV, hide_env_values = true)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Test the database connection
    Check,

    /// Create the database and tables if they do not exist
    Provision,

    /// Append a processing log entry
    Log {
        /// Log message
        message: String,

        /// Severity tag (defaults to the configured level)
        #[arg(short, long)]
        level: Option<String>,

        /// Originating component (defaults to the configured component)
        #[arg(long)]
        component: Option<String>,

        /// Attach the entry to a document ID
        #[arg(short, long)]
        document: Option<i64>,
    },

    /// Record a processed document (insert or overwrite by path)
    Record {
        /// Path of the processed file
        path: PathBuf,

        /// File name (defaults to the last path component)
        #[arg(long)]
        filename: Option<String>,

        /// File size in bytes (defaults to the local file's size)
        #[arg(long)]
        size: Option<i64>,

        /// Document classification
        #[arg(long)]
        classification: Option<String>,

        /// File holding the extracted text
        #[arg(long)]
        text_file: Option<PathBuf>,

        /// Processing status
        #[arg(long)]
        status: Option<String>,
    },

    /// Show a recorded document and its log entries
    Show {
        /// Path the document was recorded under
        path: PathBuf,

        /// Maximum number of log entries
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show connection status and record counts
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Commands that don't need a database
    match &cli.command {
        Commands::Init { force } => {
            let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
            let config = cmd_init(InitOptions {
                config_path,
                database_url: cli.database_url.clone(),
                force: *force,
            })?;
            if cli.json {
                println!(
                    r#"{{"status": "ok", "config": {}}}"#,
                    serde_json::to_string(&config.paths.config_file.display().to_string())?
                );
            } else {
                println!("✓ docledger initialized");
                println!("  Config: {}", config.paths.config_file.display());
                println!("\nNext steps:");
                println!("  1. Edit [database] url in the config file");
                println!("  2. Check the connection: docledger check");
                println!("  3. Create the schema: docledger provision");
            }
            return Ok(());
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "docledger", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli)?;
    let store = SchemaStore::new(config.descriptor()?)?;

    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Check => {
            let result = cmd_check(&store).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_check(&result);
            }
            if !result.connected {
                std::process::exit(1);
            }
        }

        Commands::Provision => {
            cmd_provision(&store).await?;
            if cli.json {
                println!(r#"{{"status": "ok", "message": "Schema provisioned"}}"#);
            } else {
                println!("✓ Database schema initialized");
            }
        }

        Commands::Log {
            message,
            level,
            component,
            document,
        } => {
            let repo = RecordRepository::new(store);
            let entry = cmd_log(
                &repo,
                &message,
                config.log_options(),
                level,
                component,
                document,
            )
            .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("✓ Log entry {} saved [{}]", entry.id, entry.level);
            }
        }

        Commands::Record {
            path,
            filename,
            size,
            classification,
            text_file,
            status,
        } => {
            let repo = RecordRepository::new(store);
            let options = RecordOptions {
                path,
                filename,
                size,
                classification,
                text_file,
                status,
            };
            let result = cmd_record(&repo, options).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "✓ Document '{}' saved with ID: {}",
                    result.file_path, result.id
                );
            }
        }

        Commands::Show { path, limit } => {
            let repo = RecordRepository::new(store);
            let limit = limit.unwrap_or(config.logging.show_limit);
            let report = cmd_show(&repo, &path, limit).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_document_report(&report);
            }
        }

        Commands::Status => {
            let repo = RecordRepository::new(store);
            let status = cmd_status(&config, &repo).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    Config::resolve(cli.config.as_deref(), cli.database_url.as_deref())
}
