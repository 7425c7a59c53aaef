use clap::Parser;
use contactmanager::cli::{run_list, run_serve, Cli, Commands};
use contactmanager::config::Config;
use contactmanager::db::Database;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply_overrides(&mut config);

    // RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None | Some(Commands::Serve(_)) => {
            run_serve(&config).await?;
        }
        Some(Commands::List) => {
            let db = Database::open_at(config.resolve_database_path()?)?;
            run_list(&db)?;
        }
    }

    Ok(())
}
