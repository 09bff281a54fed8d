use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Captured result of one analytical statement
#[derive(Debug, Clone)]
pub struct QueryOutput {
    pub statement: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Execute one read-only statement, print the statement and its result rows
/// followed by a blank separator line, and return the captured output.
pub fn run_query(conn: &Connection, statement: &str) -> Result<QueryOutput> {
    info!("Running query: {}", statement);

    let mut stmt = conn.prepare(statement)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = columns.len();

    let mut captured = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut rendered = Vec::with_capacity(column_count);
        for index in 0..column_count {
            rendered.push(render_value(row.get_ref(index)?));
        }
        captured.push(rendered);
    }

    println!("{statement}");
    println!("{}", columns.join(" | "));
    for row in &captured {
        println!("{}", row.join(" | "));
    }
    println!();

    Ok(QueryOutput {
        statement: statement.to_string(),
        columns,
        rows: captured,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::analysis_queries;
    use crate::load::load_to_db;
    use crate::types::EnrichedBankRecord;

    fn bank(name: &str, usd: f64, gbp: f64) -> EnrichedBankRecord {
        EnrichedBankRecord {
            name: name.to_string(),
            market_cap_usd_billion: usd,
            market_cap_gbp_billion: gbp,
            market_cap_eur_billion: usd * 0.93,
            market_cap_inr_billion: usd * 82.95,
        }
    }

    fn loaded_connection(banks: &[EnrichedBankRecord]) -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        load_to_db(banks, &mut conn, "Largest_banks").unwrap();
        conn
    }

    #[test]
    fn select_all_returns_every_row_in_order() {
        let banks = vec![
            bank("Alpha Bank", 300.0, 240.0),
            bank("Beta Bank", 200.0, 160.0),
            bank("Gamma Bank", 100.0, 80.0),
        ];
        let conn = loaded_connection(&banks);

        let output = run_query(&conn, "SELECT * FROM Largest_banks").unwrap();
        assert_eq!(
            output.columns,
            [
                "Name",
                "MC_USD_Billion",
                "MC_GBP_Billion",
                "MC_EUR_Billion",
                "MC_INR_Billion"
            ]
        );
        assert_eq!(output.rows.len(), 3);
        assert_eq!(output.rows[0][0], "Alpha Bank");
        assert_eq!(output.rows[2][0], "Gamma Bank");
    }

    #[test]
    fn average_query_returns_single_gbp_mean() {
        let banks = vec![
            bank("Alpha Bank", 300.0, 240.0),
            bank("Beta Bank", 200.0, 160.0),
        ];
        let conn = loaded_connection(&banks);

        let output =
            run_query(&conn, "SELECT AVG(MC_GBP_Billion) FROM Largest_banks").unwrap();
        assert_eq!(output.rows.len(), 1);
        assert_eq!(output.rows[0].len(), 1);
        let mean: f64 = output.rows[0][0].parse().unwrap();
        assert_eq!(mean, 200.0);
    }

    #[test]
    fn limit_query_returns_first_five_names_in_table_order() {
        let banks: Vec<EnrichedBankRecord> = (1..=7)
            .map(|i| bank(&format!("Bank {i}"), 100.0 * i as f64, 80.0 * i as f64))
            .collect();
        let conn = loaded_connection(&banks);

        let output = run_query(&conn, "SELECT Name FROM Largest_banks LIMIT 5").unwrap();
        let names: Vec<&str> = output.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, ["Bank 1", "Bank 2", "Bank 3", "Bank 4", "Bank 5"]);
    }

    #[test]
    fn limit_query_on_short_table_returns_fewer_rows() {
        let banks = vec![bank("Only Bank", 42.0, 33.6)];
        let conn = loaded_connection(&banks);

        let output = run_query(&conn, "SELECT Name FROM Largest_banks LIMIT 5").unwrap();
        assert_eq!(output.rows.len(), 1);
    }

    #[test]
    fn fixed_statements_reference_the_configured_table() {
        let statements = analysis_queries("Largest_banks");
        assert_eq!(
            statements,
            [
                "SELECT * FROM Largest_banks",
                "SELECT AVG(MC_GBP_Billion) FROM Largest_banks",
                "SELECT Name FROM Largest_banks LIMIT 5",
            ]
        );
    }

    #[test]
    fn malformed_statement_is_fatal() {
        let conn = loaded_connection(&[bank("Alpha Bank", 1.0, 0.8)]);
        assert!(run_query(&conn, "SELEC * FORM nothing").is_err());
    }

    #[test]
    fn average_of_empty_table_renders_null_as_empty() {
        let conn = loaded_connection(&[]);
        let output =
            run_query(&conn, "SELECT AVG(MC_GBP_Billion) FROM Largest_banks").unwrap();
        assert_eq!(output.rows.len(), 1);
        assert_eq!(output.rows[0][0], "");
    }
}
