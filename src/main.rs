use clap::Parser;
use std::path::PathBuf;
use tracing::error;

use banks_etl::config::Config;
use banks_etl::logging;
use banks_etl::pipeline;

#[derive(Parser)]
#[command(name = "banks_etl")]
#[command(about = "Largest-banks market capitalization ETL pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    println!("🏦 Running largest-banks ETL pipeline...");

    match pipeline::run_pipeline(&config).await {
        Ok(result) => {
            println!("\n📊 Pipeline Results:");
            println!("   Banks extracted: {}", result.extracted_banks);
            println!("   CSV output: {}", result.csv_path);
            println!("   Database table: {}", result.table_name);
            println!("   Queries run: {}", result.queries.len());
            println!("   Duration: {:.2}s", result.duration_secs);
            Ok(())
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            Err(e.into())
        }
    }
}
