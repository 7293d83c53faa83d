use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use trivia_api::configuration::get_configuration;
use trivia_api::db::{self, SqliteStore};
use trivia_api::server::run_server;
use trivia_api::telemetry::{init_tracing, SERVER_LOG_DIRECTIVES};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(default_value = "serve")]
    runner: Runner,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Runner {
    /// Apply migrations and serve the API
    Serve,
    /// Apply migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(SERVER_LOG_DIRECTIVES)?;
    let cli = Cli::parse();
    let settings = get_configuration().context("Failed to load configuration")?;
    let pool = db::establish_connection(&settings.database)
        .await
        .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool)
        .await
        .context("Migrations failed")?;

    match cli.runner {
        Runner::Serve => run_server(Arc::new(SqliteStore::new(pool)), &settings.server).await?,
        Runner::Migrate => tracing::info!("Migrations applied"),
    }
    Ok(())
}
