use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

pub mod list;
pub mod serve;

pub use list::run_list;
pub use serve::run_serve;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "contactmanager")]
#[command(about = "Contact manager web application")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides CONTACTMANAGER_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server (default)
    Serve(ServeArgs),
    /// Print every contact with its emails
    List,
}

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Listen address (overrides CONTACTMANAGER_BIND)
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref path) = self.db {
            config.database_path = Some(path.clone());
        }
        if let Some(Commands::Serve(ref args)) = self.command {
            if let Some(bind) = args.bind {
                config.bind_address = bind;
            }
        }
    }
}
