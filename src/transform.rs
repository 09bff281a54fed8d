use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::constants::REQUIRED_CURRENCIES;
use crate::error::{EtlError, Result};
use crate::types::{BankRecord, EnrichedBankRecord};

/// One row of the exchange-rate side file
#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// USD conversion rates for the three target currencies, validated at load
/// time so a bad side file fails the run before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    pub gbp: f64,
    pub eur: f64,
    pub inr: f64,
}

impl ExchangeRates {
    /// Read a `Currency,Rate` CSV into the rate table. Codes beyond the
    /// required three are ignored.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;

        let mut rates: HashMap<String, f64> = HashMap::new();
        for row in reader.deserialize() {
            let row: RateRow = row.map_err(|e| {
                EtlError::parse(format!(
                    "malformed exchange rate row in '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            rates.insert(row.currency, row.rate);
        }

        let mut required = [0.0_f64; 3];
        for (slot, code) in required.iter_mut().zip(REQUIRED_CURRENCIES) {
            let rate = *rates.get(code).ok_or_else(|| {
                EtlError::parse(format!(
                    "exchange rate file '{}' is missing currency '{}'",
                    path.display(),
                    code
                ))
            })?;
            if !(rate > 0.0) {
                return Err(EtlError::parse(format!(
                    "exchange rate for '{code}' must be positive, got {rate}"
                )));
            }
            *slot = rate;
        }

        info!("Loaded exchange rates from {}", path.display());
        Ok(Self {
            gbp: required[0],
            eur: required[1],
            inr: required[2],
        })
    }
}

/// Round to two decimal places, IEEE-754 half-away-from-zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Add the converted market-cap columns to every record, preserving order.
pub fn transform(records: Vec<BankRecord>, rates: &ExchangeRates) -> Vec<EnrichedBankRecord> {
    records
        .into_iter()
        .map(|record| {
            let usd = record.market_cap_usd_billion;
            EnrichedBankRecord {
                name: record.name,
                market_cap_usd_billion: usd,
                market_cap_gbp_billion: round2(usd * rates.gbp),
                market_cap_eur_billion: round2(usd * rates.eur),
                market_cap_inr_billion: round2(usd * rates.inr),
            }
        })
        .collect()
}
