use std::path::PathBuf;

use clap::{Parser, Subcommand};

use leadflow::{GatewayConfig, LeadGateway};

#[derive(Parser)]
#[command(name = "leadflow-gateway")]
#[command(version)]
#[command(about = "Lead intake and integration fan-out gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8818")]
    bind_addr: String,

    /// Base URL of the backend that performs CRM pushes and sends the
    /// templated emails.
    #[arg(long, env = "LEADFLOW_BACKEND_URL", default_value = "http://localhost:8080")]
    backend_url: String,

    #[arg(long, default_value = "storage/customers")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => serve(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn serve(args: ServeArgs) -> Result<(), String> {
    let config = GatewayConfig {
        bind_addr: args.bind_addr,
        backend_url: args.backend_url,
        data_dir: args.data_dir,
    };
    LeadGateway::start(config).await.map_err(|e| e.to_string())
}
