/// Column and currency constants to ensure consistency across the codebase
/// These define the persisted schema shared by the CSV and database loaders

// Canonical column names, in persisted order
pub const COL_NAME: &str = "Name";
pub const COL_MC_USD: &str = "MC_USD_Billion";
pub const COL_MC_GBP: &str = "MC_GBP_Billion";
pub const COL_MC_EUR: &str = "MC_EUR_Billion";
pub const COL_MC_INR: &str = "MC_INR_Billion";

pub const BANK_TABLE_COLUMNS: [&str; 5] =
    [COL_NAME, COL_MC_USD, COL_MC_GBP, COL_MC_EUR, COL_MC_INR];

// Currencies the exchange-rate file must provide
pub const REQUIRED_CURRENCIES: [&str; 3] = ["GBP", "EUR", "INR"];

// Archived snapshot: the ranking page is pinned so extraction stays stable
pub const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

pub const DEFAULT_RATES_PATH: &str = "exchange_rate.csv";
pub const DEFAULT_CSV_PATH: &str = "Largest_banks_data.csv";
pub const DEFAULT_DB_PATH: &str = "Banks.db";
pub const DEFAULT_TABLE_NAME: &str = "Largest_banks";
pub const DEFAULT_RUN_LOG_PATH: &str = "code_log.txt";

/// The three fixed analytical statements run after loading, in order
pub fn analysis_queries(table_name: &str) -> Vec<String> {
    vec![
        format!("SELECT * FROM {table_name}"),
        format!("SELECT AVG({COL_MC_GBP}) FROM {table_name}"),
        format!("SELECT {COL_NAME} FROM {table_name} LIMIT 5"),
    ]
}
