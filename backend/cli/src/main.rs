mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use pantrysnap_core::VisionModel;
use pantrysnap_gateway::GatewayState;
use pantrysnap_inventory::MockPlanner;
use pantrysnap_vision::{GeminiVision, ImageToJsonTool};

use config::Config;

#[derive(Parser)]
#[command(name = "pantrysnap")]
#[command(about = "PantrySnap — pantry photo and receipt inventory backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the PantrySnap HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status,
    /// Convert a single image to structured JSON without starting the server
    Convert {
        /// Path to the image file
        image: PathBuf,
        /// Write the result to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the default extraction prompt
        #[arg(short, long)]
        prompt: Option<String>,
        /// Override GOOGLE_AI_API_KEY for this invocation
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    logging::init_logger(&config.log_dir, &config.log_level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            println!("PantrySnap status: checking...");
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("PantrySnap is not running on port {}", config.port);
                }
            }
        }
        Commands::Convert {
            image,
            output,
            prompt,
            api_key,
        } => {
            run_convert(config, image, output, prompt, api_key).await?;
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        model = %config.vision.model,
        "Starting PantrySnap server"
    );

    if config.vision.api_key.is_none() {
        warn!("GOOGLE_AI_API_KEY is not set; uploads will fall back to mock inventory data");
    }

    let model: Arc<dyn VisionModel> = Arc::new(GeminiVision::from_settings(&config.vision));
    let tool = Arc::new(ImageToJsonTool::new(model, config.vision.clone()));
    let state = GatewayState::new(tool, Arc::new(MockPlanner));

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address {}:{}",
                config.bind_address, config.port
            )
        })?;

    pantrysnap_gateway::serve(addr, state).await
}

async fn run_convert(
    config: Config,
    image: PathBuf,
    output: Option<PathBuf>,
    prompt: Option<String>,
    api_key: Option<String>,
) -> Result<()> {
    let mut settings = config.vision;
    if api_key.is_some() {
        settings.api_key = api_key;
    }

    let model: Arc<dyn VisionModel> = Arc::new(GeminiVision::from_settings(&settings));
    let tool = ImageToJsonTool::new(model, settings);

    let response = tool
        .convert(&image, prompt.as_deref(), output.as_deref())
        .await?;

    info!(
        model = %response.metadata.model,
        tokens = response.metadata.tokens_used,
        "Conversion finished"
    );

    match output {
        Some(path) => {
            println!("Wrote {}", tool.resolve_output_path(&path).display());
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&response.json_data)?);
        }
    }

    Ok(())
}
