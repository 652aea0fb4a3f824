mod adapter;
mod config;
mod converters;
mod error;
mod llm_client;
mod logging;
mod model_checks;
mod models;
mod request_id;
mod router;
mod state;

use clap::Parser;
use config::{Config, Overrides};
use state::AppState;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(name = "gemini-gateway")]
#[command(about = "HTTP gateway forwarding prompts and uploads to Gemini")]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0")]
    ip: String,

    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Optional YAML file with model, api_base, max_upload_bytes and default_prompts
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(short, long)]
    model: Option<String>,

    #[arg(long)]
    api_base: Option<String>,

    #[arg(long)]
    max_upload_bytes: Option<usize>,

    /// trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Also write logs to this file (capped at 10 MiB)
    #[arg(long)]
    log_file: Option<String>,

    /// socks and http proxy, example: socks5://192.168.0.2:10080
    #[arg(long)]
    proxy: Option<String>,

    /// Send a test prompt upstream before accepting requests
    #[arg(long)]
    check_model: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = Level::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", args.log_level);
        Level::INFO
    });
    logging::init_logging(log_level, args.log_file.as_deref().map(Path::new));

    let config = Config::load(
        args.config.as_deref(),
        Overrides {
            api_key: args.api_key,
            model: args.model,
            api_base: args.api_base,
            max_upload_bytes: args.max_upload_bytes,
        },
    )?;
    info!("Using model {} at {}", config.model, config.api_base);

    let client_builder = reqwest::Client::builder();
    let client_builder = match &args.proxy {
        Some(proxy) => client_builder.proxy(reqwest::Proxy::all(proxy)?),
        None => client_builder,
    };
    let http_client = Arc::new(client_builder.build()?);

    let app_state = AppState::new(config, http_client);

    if args.check_model {
        model_checks::perform_model_check(&app_state.llm_client).await?;
    }

    let app = router::build_router(app_state);

    let bind_address = format!("{}:{}", args.ip, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server ready on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
