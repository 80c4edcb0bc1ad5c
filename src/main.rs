use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use stylx_api::{gemini, GeminiClient, GeminiConfig, RestApi};
use stylx_similarity::{Retriever, RetrieverConfig};
use stylx_storage::CatalogLoader;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Garment search and similar-item recommendations over an embedded catalog
#[derive(Parser, Debug)]
#[command(name = "stylx")]
#[command(about = "Garment retrieval server", long_about = None)]
struct Args {
    /// Catalog file or directory of .json / .jsonl catalog files
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8501)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Results returned per query
    #[arg(long, default_value_t = 5)]
    top_n: usize,

    /// Similar items attached to each result
    #[arg(long, default_value_t = 5)]
    similar_count: usize,

    /// Also narrow image queries by the color in their description
    #[arg(long)]
    color_filter_images: bool,

    /// Embedding calls per query before reporting the provider unavailable
    #[arg(long, default_value_t = 2)]
    embed_attempts: usize,

    /// Wait before the first embedding retry, in milliseconds; doubles per retry
    #[arg(long, default_value_t = 500)]
    embed_backoff_ms: u64,

    /// Gemini API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: String,

    /// Gemini API base URL
    #[arg(long, default_value = gemini::DEFAULT_API_BASE)]
    api_base: String,

    /// Embedding model; must match the model that embedded the catalog
    #[arg(long, default_value = gemini::DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,

    /// Vision model used to describe uploaded images
    #[arg(long, default_value = gemini::DEFAULT_VISION_MODEL)]
    vision_model: String,

    /// Timeout for each provider request, in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Stylx v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog path: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);

    let catalog = CatalogLoader::load(&args.data_dir)?;

    let gemini = Arc::new(GeminiClient::new(GeminiConfig {
        api_key: args.api_key,
        base_url: args.api_base,
        embedding_model: args.embedding_model,
        vision_model: args.vision_model,
        timeout: Duration::from_secs(args.request_timeout_secs),
    })?);

    let retriever = Arc::new(Retriever::new(
        catalog,
        gemini.clone(),
        gemini,
        RetrieverConfig {
            top_n: args.top_n,
            similar_count: args.similar_count,
            color_filter_text: true,
            color_filter_image: args.color_filter_images,
            embed_attempts: args.embed_attempts,
            retry_backoff: Duration::from_millis(args.embed_backoff_ms),
        },
    )?);

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(retriever, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("Stylx started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
