use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use trader_core::connection::DEFAULT_RPC_URL;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// RPC URL prefilled in the connection panel
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Base58 funding secret prefilled in the connection panel
    #[arg(short, long, env = "FUNDING_SECRET", hide_env_values = true)]
    pub funding_secret: Option<String>,

    /// Directory for wallet and log exports
    #[arg(short, long, env = "EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// File receiving tracing output (the terminal itself owns stdout)
    #[arg(short, long, env = "TRADER_LOG_FILE", default_value = "trader.log")]
    pub log_file: PathBuf,
}

pub fn load_config() -> Args {
    dotenv().ok();
    Args::parse()
}
