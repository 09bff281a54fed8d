use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{EtlError, Result};
use crate::types::BankRecord;

/// Fetch the source page over a single unauthenticated GET. No retry; a
/// transport failure or non-success status is fatal to the run.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    info!("HTTP GET request to: {}", url);
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    info!("Fetched {} bytes", body.len());
    Ok(body)
}

/// Parse the ranking table out of the page.
///
/// The table is selected positionally: all tbody elements in document order,
/// take the one at `table_index`. Row handling:
///   - rows with no td cells are header/separator rows and are skipped,
///   - rows whose second cell has no link are ranking notes, not banks,
///     and are skipped,
///   - for the rest, the bank name is the link text of the second cell and
///     the market cap is the third cell's text parsed as a decimal.
pub fn parse_bank_table(html: &str, table_index: usize) -> Result<Vec<BankRecord>> {
    let document = Html::parse_document(html);
    let tbody_selector = Selector::parse("tbody").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let body = document
        .select(&tbody_selector)
        .nth(table_index)
        .ok_or_else(|| {
            EtlError::parse(format!("page has no table body at index {table_index}"))
        })?;

    let mut records = Vec::new();
    for row in body.select(&tr_selector) {
        let cells: Vec<_> = row.select(&td_selector).collect();
        if cells.len() < 2 {
            continue;
        }
        let Some(link) = cells[1].select(&link_selector).next() else {
            continue;
        };
        let name = link.text().collect::<String>().trim().to_string();
        if cells.len() < 3 {
            return Err(EtlError::parse(format!(
                "row for '{name}' has no market-cap cell"
            )));
        }
        let raw_value = cells[2].text().collect::<String>();
        let raw_value = raw_value.trim();
        let market_cap: f64 = raw_value.parse().map_err(|_| {
            EtlError::parse(format!(
                "market cap for '{name}' is not numeric: '{raw_value}'"
            ))
        })?;
        records.push(BankRecord {
            name,
            market_cap_usd_billion: market_cap,
        });
    }

    if records.is_empty() {
        warn!("No bank rows found - the page structure may have changed");
    }

    Ok(records)
}

/// Fetch and parse in one step, per the configured source.
pub async fn extract(client: &reqwest::Client, config: &Config) -> Result<Vec<BankRecord>> {
    let html = fetch_page(client, &config.source.url).await?;
    let records = parse_bank_table(&html, config.source.table_index)?;
    info!("Extracted {} bank records", records.len());
    Ok(records)
}

/// Shared HTTP client. The archive frontend rejects the default reqwest
/// user agent, so send a browser one.
pub fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36")
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANKING_PAGE: &str = r#"
        <html><body>
        <table>
          <tbody>
            <tr><th>Rank</th><th>Bank name</th><th>Market cap (US$ billion)</th></tr>
            <tr>
              <td>1</td>
              <td><a href="/wiki/JPMorgan_Chase">JPMorgan Chase</a></td>
              <td>432.92
</td>
            </tr>
            <tr>
              <td>2</td>
              <td><a href="/wiki/Bank_of_America">Bank of America</a></td>
              <td>231.52
</td>
            </tr>
            <tr>
              <td>-</td>
              <td>Figures restated after merger</td>
              <td>0.00</td>
            </tr>
            <tr>
              <td>3</td>
              <td><a href="/wiki/ICBC">Industrial and Commercial Bank of China</a></td>
              <td>194.56
</td>
            </tr>
          </tbody>
        </table>
        <table>
          <tbody>
            <tr>
              <td>1</td>
              <td><a href="/wiki/Other">Some Other Ranking</a></td>
              <td>9.99</td>
            </tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_only_rows_with_linked_names() {
        let records = parse_bank_table(RANKING_PAGE, 0).unwrap();
        // header row and the linkless note row are skipped
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "JPMorgan Chase");
        assert_eq!(records[0].market_cap_usd_billion, 432.92);
        assert_eq!(records[1].name, "Bank of America");
        assert_eq!(records[2].name, "Industrial and Commercial Bank of China");
        assert_eq!(records[2].market_cap_usd_billion, 194.56);
    }

    #[test]
    fn preserves_page_order() {
        let records = parse_bank_table(RANKING_PAGE, 0).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "JPMorgan Chase",
                "Bank of America",
                "Industrial and Commercial Bank of China"
            ]
        );
    }

    #[test]
    fn table_index_selects_a_different_tbody() {
        let records = parse_bank_table(RANKING_PAGE, 1).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Some Other Ranking");
    }

    #[test]
    fn missing_table_index_is_a_parse_error() {
        let result = parse_bank_table(RANKING_PAGE, 7);
        assert!(matches!(result, Err(EtlError::Parse(_))));
    }

    #[test]
    fn non_numeric_market_cap_is_a_parse_error() {
        let html = r#"
            <table><tbody>
              <tr>
                <td>1</td>
                <td><a href="/wiki/X">First Bank</a></td>
                <td>n/a</td>
              </tr>
            </tbody></table>
        "#;
        let result = parse_bank_table(html, 0);
        match result {
            Err(EtlError::Parse(message)) => {
                assert!(message.contains("First Bank"));
                assert!(message.contains("n/a"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn row_without_market_cap_cell_is_a_parse_error() {
        let html = r#"
            <table><tbody>
              <tr>
                <td>1</td>
                <td><a href="/wiki/X">Truncated Bank</a></td>
              </tr>
            </tbody></table>
        "#;
        let result = parse_bank_table(html, 0);
        assert!(matches!(result, Err(EtlError::Parse(_))));
    }

    #[test]
    fn empty_table_yields_no_records() {
        let html = "<table><tbody></tbody></table>";
        let records = parse_bank_table(html, 0).unwrap();
        assert!(records.is_empty());
    }
}
