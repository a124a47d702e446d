use avatar_server::config::ServerConfig;
use avatar_server::network::Server;
use avatar_server::store::AvatarStore;
use clap::Parser;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Maximum number of concurrent WebSocket connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        max_connections: args.max_connections,
    };

    let store = Arc::new(RwLock::new(AvatarStore::new()));
    let server = Server::bind(&config, Arc::clone(&store)).await?;
    info!("Server started on http://{}", server.local_addr()?);

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down ({} avatars tracked)", store.read().await.len());
        }
    }

    Ok(())
}
