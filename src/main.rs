mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use product_catalog::{api, config::Config, observability};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    observability::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let mut config = Config::load_with(args.config)?;
            if let Some(port) = args.port {
                config.server.port = port;
            }
            api::run(config).await?
        }
    }

    Ok(())
}
