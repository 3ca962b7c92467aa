use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "product-catalog")]
#[command(about = "Product catalog HTTP service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// TOML configuration file (defaults to $CATALOG_CONFIG or config/catalog.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Port to listen on, overriding configuration and $PORT
    #[arg(long)]
    pub port: Option<u16>,
}
