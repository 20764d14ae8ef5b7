use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use billbridge_server::auth;
use billbridge_store::StoreConfig;

#[derive(Parser)]
#[command(name = "billbridge-server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new API key
    Keygen,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Keygen) => {
            let raw_key = auth::generate_api_key();
            // Print the raw key to stdout so it can be captured
            println!("{raw_key}");
            eprintln!("\nSet BILLBRIDGE_API_KEY to this value to require authentication.");
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .init();

            let db = match std::env::var("BILLBRIDGE_DB") {
                Ok(path) => billbridge_db::Db::open(Path::new(&path))?,
                Err(_) => billbridge_db::Db::open_default()?,
            };
            let store = billbridge_store::create_store(&StoreConfig::from_env())?;

            let bind = std::env::var("BILLBRIDGE_BIND").unwrap_or_else(|_| "0.0.0.0".into());
            let port: u16 = std::env::var("BILLBRIDGE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3840);
            let addr = SocketAddr::new(bind.parse()?, port);

            let auth = auth::build_auth_config();
            if auth.is_some() {
                info!("authentication enabled");
            } else {
                info!("authentication disabled (BILLBRIDGE_API_KEY not set)");
            }

            let listener = TcpListener::bind(addr).await?;
            info!("billbridge-server listening on http://{addr}");

            billbridge_server::serve(listener, db, store, auth).await?;
        }
    }

    Ok(())
}
