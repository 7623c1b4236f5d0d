use clap::Parser;
use tracing::info;

use hl_scraper::IngestPipeline;
use hl_web::AppState;

const DEFAULT_SOURCE_URL: &str = "https://www.washingtonpost.com/lifestyle/";
const DEFAULT_PORT: u16 = 2000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, default_value = "memory")]
    storage: String,
    /// Database URL for the sqlite backend (falls back to HL_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
    /// Index page to scrape
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    source_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (falls back to PORT, then 2000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one ingest cycle and exit
    Scrape {
        /// Override the configured source URL
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("HL_DATABASE_URL").ok());
    let (articles, notes) =
        hl_storage::create_storage(&cli.storage, database_url.as_deref()).await?;
    info!("💾 storage initialized (using {})", cli.storage);

    match cli.command {
        Commands::Serve { port } => {
            let port = port
                .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
                .unwrap_or(DEFAULT_PORT);
            let state = AppState::new(articles, notes, cli.source_url);
            hl_web::serve(state, port).await?;
        }
        Commands::Scrape { url } => {
            let source = url.as_deref().unwrap_or(&cli.source_url);
            info!("🗞️ scraping {}", source);
            let pipeline = IngestPipeline::new(articles);
            let count = pipeline.scrape_and_ingest(source).await?;
            println!("ingested {} articles", count);
        }
    }

    Ok(())
}
