use serde::{Deserialize, Serialize};

/// One qualifying row of the source ranking, as extracted from the page
#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub name: String,
    pub market_cap_usd_billion: f64,
}

/// A bank record with market cap converted into the three target currencies.
/// Field order and serde names define the persisted column schema shared by
/// the CSV file and the database table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBankRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MC_USD_Billion")]
    pub market_cap_usd_billion: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub market_cap_gbp_billion: f64,
    #[serde(rename = "MC_EUR_Billion")]
    pub market_cap_eur_billion: f64,
    #[serde(rename = "MC_INR_Billion")]
    pub market_cap_inr_billion: f64,
}
