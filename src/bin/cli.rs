use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trivia_api::configuration::DatabaseSettings;
use trivia_api::db::{establish_connection, run_migrations, transfer};
use trivia_api::telemetry::{init_tracing, CLI_LOG_DIRECTIVES};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database URL, e.g. sqlite:trivia.db
    db_url: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(CLI_LOG_DIRECTIVES)?;
    let cli = Cli::parse();
    let settings = DatabaseSettings {
        url: cli.db_url.into(),
        max_connections: 1,
    };
    let pool = establish_connection(&settings).await?;
    run_migrations(&pool).await?;
    match cli.command {
        Commands::Export { path } => transfer::export_data(&pool, &path).await?,
        Commands::Import { path } => transfer::import_data(&pool, &path).await?,
    }
    Ok(())
}
