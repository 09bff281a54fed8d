use rusqlite::Connection;
use std::time::Instant;
use tracing::{info, instrument};

use crate::config::Config;
use crate::constants::analysis_queries;
use crate::error::Result;
use crate::extract;
use crate::load;
use crate::logging::RunLog;
use crate::query::{self, QueryOutput};
use crate::transform::{self, ExchangeRates};

/// Result of a complete pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    pub extracted_banks: usize,
    pub csv_path: String,
    pub table_name: String,
    pub queries: Vec<QueryOutput>,
    pub duration_secs: f64,
}

/// Run the whole ETL sequence: extract -> transform -> load to CSV and
/// database -> run the fixed analytical queries. Strictly sequential, no
/// retries; the first failing stage aborts the run and the milestone log
/// holds the record of how far it got.
#[instrument(skip(config))]
pub async fn run_pipeline(config: &Config) -> Result<PipelineResult> {
    let started = Instant::now();
    let run_log = RunLog::new(&config.log.path);

    run_log.log("Preliminaries complete. Initiating ETL process")?;

    let client = extract::http_client()?;
    let records = extract::extract(&client, config).await?;
    run_log.log("Data extraction complete. Initiating Transformation process")?;

    // Rates load first so a malformed side file aborts before any output
    // file or table is touched.
    let rates = ExchangeRates::from_csv_path(&config.rates.path)?;
    let table = transform::transform(records, &rates);
    run_log.log("Data transformation complete. Initiating loading process")?;

    load::load_to_csv(&table, &config.output.csv_path)?;
    run_log.log("Data saved to CSV file")?;

    let mut conn = Connection::open(&config.output.db_path)?;
    run_log.log("SQL Connection initiated")?;

    load::load_to_db(&table, &mut conn, &config.output.table_name)?;
    run_log.log("Data loaded to Database as table")?;

    let mut queries = Vec::new();
    for statement in analysis_queries(&config.output.table_name) {
        queries.push(query::run_query(&conn, &statement)?);
    }

    run_log.log("Process Complete")?;

    let duration_secs = started.elapsed().as_secs_f64();
    info!("Pipeline finished in {:.2}s", duration_secs);

    // conn drops here, releasing the database on every exit path above too
    Ok(PipelineResult {
        extracted_banks: table.len(),
        csv_path: config.output.csv_path.display().to_string(),
        table_name: config.output.table_name.clone(),
        queries,
        duration_secs,
    })
}
