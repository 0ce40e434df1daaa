use ai_analyst::GeminiClient;
use analytics::AnalyticsEngine;
use clap::{Parser, Subcommand};
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use web_server::AppState;

/// A personal trading journal with an analytics engine and AI review.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the JSON API server.
    Serve(ServeArgs),
    /// Apply the database migrations and exit.
    Migrate,
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the listen address from config.toml (e.g. "0.0.0.0:8080").
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from the .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Migrate => migrate().await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config()?;

    let db_pool = database::connect().await?;
    database::run_migrations(&db_pool).await?;

    let addr = match args.addr {
        Some(addr) => addr,
        None => format!("{}:{}", config.server.host, config.server.port).parse()?,
    };

    let analyst = GeminiClient::from_env(&config.analyst)?;
    let state = AppState {
        db_repo: DbRepository::new(db_pool),
        engine: AnalyticsEngine::new(),
        analyst: Arc::new(analyst),
        history_days: config.analyst.history_days,
    };

    web_server::run_server(addr, state).await
}

async fn migrate() -> anyhow::Result<()> {
    let db_pool = database::connect().await?;
    database::run_migrations(&db_pool).await?;
    tracing::info!("Migrations applied.");
    Ok(())
}
