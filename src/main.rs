use clap::Parser;
use std::error::Error;
use subnet_explorer::app;
use subnet_explorer::cli::{Cli, Command};
use subnet_explorer::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let log_config = Config::log_config_from_env();
    if let Err(e) = log4rs::init_file(&log_config, Default::default()) {
        eprintln!("Logging disabled, {}: {e}", log_config.display());
    }
    log::info!("#Start main()");
    let config = Config::from_env();

    let cli = Cli::parse();
    app::run(cli.command.unwrap_or(Command::Show), &config).await
}
