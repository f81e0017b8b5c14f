mod config;
mod explorer;
mod insight;
mod profile;
mod server;

use anyhow::Result;
use clap::{Arg, Command};
use config::Config;
use server::TxInsightServer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr; stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let matches = Command::new("tx-insight")
        .version("0.1.0")
        .about("Explains what pending blockchain transactions will do")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file"),
        )
        .arg(
            Arg::new("chain")
                .short('n')
                .long("chain")
                .value_name("CHAIN")
                .help("Default chain to use (ethereum, sepolia, polygon, arbitrum)"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .help("Generate a sample configuration file and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config-path")
                .long("config-path")
                .help("Print the default configuration file path and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("generate-config") {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        return Ok(());
    }

    if matches.get_flag("config-path") {
        match Config::default_config_path() {
            Ok(path) => {
                println!("{}", path.display());
                return Ok(());
            }
            Err(e) => {
                error!("Could not determine default config path: {}", e);
                return Err(e);
            }
        }
    }

    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let mut config = Config::load_or_default(config_path).await;

    if let Some(chain) = matches.get_one::<String>("chain") {
        config.default_chain = chain.clone();
    }

    info!("Starting tx-insight");
    info!("Default chain: {}", config.default_chain);
    info!(
        "Identity verification required: {}",
        config.insight.require_identity_verification
    );

    let server = TxInsightServer::new(config)?;

    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
