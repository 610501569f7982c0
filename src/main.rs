use anyhow::Context;
use clap::{Parser, Subcommand};
use restaurant_scraper::apis::factory::create_client;
use restaurant_scraper::config::Config;
use restaurant_scraper::constants;
use restaurant_scraper::infra::{HttpClientPort, ReqwestHttp};
use restaurant_scraper::logging;
use restaurant_scraper::output::{OutputFormat, OutputWriter};
use restaurant_scraper::pipeline::Pipeline;
use restaurant_scraper::types::Query;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

#[derive(Parser)]
#[command(name = "restaurant_scraper")]
#[command(about = "Restaurant listing scraper for place-search and content-search APIs")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML file with rate limits and timeouts (default: scraper.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Env file holding the API keys (default: .env if present)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one source for one query and write a JSON or CSV file
    Run {
        /// Source to scrape. Available: google-places, google-places-csv, trip-advisor
        #[arg(long, default_value = constants::GOOGLE_PLACES_SOURCE)]
        source: String,
        /// Search query (defaults to a per-source example query)
        #[arg(long)]
        query: Option<String>,
        /// Output format: json or csv
        #[arg(long, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Directory for output files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// List supported sources
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sources => {
            for source in constants::get_supported_sources() {
                println!("{source}");
            }
        }
        Commands::Run {
            source,
            query,
            format,
            output_dir,
        } => {
            let config = Config::load(cli.config.as_deref(), cli.env_file.as_deref())
                .context("failed to load configuration")?;
            logging::init_logging(&config.logging).context("failed to set up logging")?;
            let http: Arc<dyn HttpClientPort> = Arc::new(ReqwestHttp::new());
            let client = create_client(&source, &config, http, &output_dir)
                .with_context(|| format!("cannot start source '{source}'"))?;

            let query = Query::new(query.unwrap_or_else(|| constants::default_query(&source).to_string()));
            let writer = OutputWriter::new(&output_dir, format);
            let run_id = uuid::Uuid::new_v4();

            let result = Pipeline::run(client.as_ref(), &query, &writer)
                .instrument(info_span!("scrape", %run_id))
                .await
                .context("failed to write output")?;

            info!(
                found = result.found,
                kept = result.kept,
                dropped = result.dropped,
                "Run complete"
            );
            println!("\n📊 Results for {} ({}):", result.source, result.query);
            println!("   Found: {}", result.found);
            println!("   Kept: {}", result.kept);
            println!("   Dropped: {}", result.dropped);
            match &result.output_file {
                Some(path) => println!("   Output file: {}", path.display()),
                None => println!("   Output file: none (no valid records)"),
            }
        }
    }
    Ok(())
}
