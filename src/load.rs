use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::constants::{COL_MC_EUR, COL_MC_GBP, COL_MC_INR, COL_MC_USD, COL_NAME};
use crate::error::{EtlError, Result};
use crate::types::EnrichedBankRecord;

/// Write the table to a CSV file, header first, one row per record in table
/// order. The file is written to a sibling temp path and renamed into place
/// so readers never observe a half-written file.
pub fn load_to_csv(table: &[EnrichedBankRecord], path: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| EtlError::Config(format!("invalid CSV output path '{}'", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut writer = csv::Writer::from_path(&tmp_path)?;
    for record in table {
        writer.serialize(record)?;
    }
    writer.flush()?;
    drop(writer);
    fs::rename(&tmp_path, path)?;

    info!("Saved {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Full-replace load into the named SQLite table. Rows land in a staging
/// table first and are swapped into place inside one transaction, so a
/// failure part-way leaves the previous table intact.
pub fn load_to_db(
    table: &[EnrichedBankRecord],
    conn: &mut Connection,
    table_name: &str,
) -> Result<()> {
    let staging = format!("{table_name}_staging");
    let tx = conn.transaction()?;

    tx.execute_batch(&format!(
        r#"
        DROP TABLE IF EXISTS "{staging}";
        CREATE TABLE "{staging}" (
            {COL_NAME}   TEXT NOT NULL,
            {COL_MC_USD} REAL NOT NULL,
            {COL_MC_GBP} REAL NOT NULL,
            {COL_MC_EUR} REAL NOT NULL,
            {COL_MC_INR} REAL NOT NULL
        );
        "#
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            r#"INSERT INTO "{staging}"
               ({COL_NAME}, {COL_MC_USD}, {COL_MC_GBP}, {COL_MC_EUR}, {COL_MC_INR})
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
        ))?;
        for record in table {
            stmt.execute(params![
                record.name,
                record.market_cap_usd_billion,
                record.market_cap_gbp_billion,
                record.market_cap_eur_billion,
                record.market_cap_inr_billion,
            ])?;
        }
    }

    tx.execute_batch(&format!(
        r#"
        DROP TABLE IF EXISTS "{table_name}";
        ALTER TABLE "{staging}" RENAME TO "{table_name}";
        "#
    ))?;
    tx.commit()?;

    info!("Loaded {} rows into table {}", table.len(), table_name);
    Ok(())
}
