use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm_migration::MigratorTrait;

use job_listings::infra::storage::migrations::Migrator;
use job_listings::JobListingsConfig;
use listing_db::{redact_credentials_in_dsn, ConnectOpts, DbHandle};
use runtime::{AppConfig, CliArgs};

mod http;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MODULE_NAME: &str = "job_listings";
const MOCK_DSN: &str = "sqlite::memory:";

/// Job board listing server
#[derive(Parser)]
#[command(name = "jobboard-server")]
#[command(about = "Job board listing server: employer dashboards for jobs, transactions and offers")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database with the schema applied
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Job board server starting");

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config, &args),
        Commands::Migrate => migrate(&config, &args).await,
    }
}

fn listings_config(config: &AppConfig) -> Result<JobListingsConfig> {
    JobListingsConfig::from_module_value(config.module_config(MODULE_NAME))
        .with_context(|| format!("Invalid modules.{MODULE_NAME} configuration"))
}

/// Connect to the configured database, or to in-memory SQLite with `--mock`.
async fn connect(config: &AppConfig, args: &CliArgs) -> Result<DbHandle> {
    let (dsn, opts) = if args.mock {
        (MOCK_DSN.to_string(), ConnectOpts::default())
    } else {
        let db = config
            .database
            .as_ref()
            .ok_or_else(|| anyhow!("No database configured (use --mock for an in-memory store)"))?;
        let opts = ConnectOpts {
            max_conns: db.max_conns,
            acquire_timeout: Some(Duration::from_secs(5)),
            sqlite_busy_timeout: db
                .busy_timeout_ms
                .map(|ms| Duration::from_millis(u64::from(ms))),
            create_sqlite_dirs: true,
            ..Default::default()
        };
        (db.resolved_url(&config.home_dir()), opts)
    };

    tracing::info!("Connecting to database: {}", redact_credentials_in_dsn(&dsn));
    let db = DbHandle::connect(&dsn, opts)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected DB backend: {:?}", db.engine());
    Ok(db)
}

async fn apply_migrations(db: &DbHandle) -> Result<()> {
    Migrator::up(&db.sea(), None)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Database schema is up to date");
    Ok(())
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let listings = listings_config(&config)?;
    let db = connect(&config, &args).await?;

    let auto_migrate = config.database.as_ref().map_or(true, |d| d.auto_migrate);
    if args.mock || auto_migrate {
        apply_migrations(&db).await?;
    } else {
        tracing::warn!("auto_migrate disabled; listings report NotProvisioned until `migrate` runs");
    }

    let service = job_listings::build_service(db.sea(), &listings);
    let router = http::build_router(service, &config.server);
    let served = http::serve(router, &config.server).await;

    db.close().await;
    tracing::info!("Job board server stopped");
    served
}

fn check_config(config: &AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");
    let listings = listings_config(config)?;
    if config.database.is_none() && !args.mock {
        return Err(anyhow!("No database configured"));
    }
    let limits = listings.limits();
    println!("Configuration check passed");
    println!(
        "Listing page size: default {}, max {}",
        limits.default, limits.max
    );
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn migrate(config: &AppConfig, args: &CliArgs) -> Result<()> {
    let db = connect(config, args).await?;
    let result = apply_migrations(&db).await;
    db.close().await;
    result?;
    println!("Migrations applied");
    Ok(())
}
