use avatar_client::network::Client;
use avatar_client::scenario;
use clap::Parser;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket URL of the server to check
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut client = Client::connect(&args.server).await?;

    match scenario::run(&mut client).await {
        Ok(report) => {
            info!(
                "{} steps passed over {} requests",
                report.steps_passed,
                client.requests_sent()
            );
            println!("All tests passed!");
        }
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    }

    client.close().await?;

    Ok(())
}
