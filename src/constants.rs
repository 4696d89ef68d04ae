//! Domain constants and defaults shared across the pipeline.

/// Header sentinel token found in the stock column of some raw feeds.
/// Rows whose stock field equals this token (case-insensitive) are headers,
/// not data, and are dropped by the parser.
pub const STOCK_HEADER_TOKEN: &str = "STAN";

/// Default numeric stand-in for the "> 5" threshold notation. Suppliers print
/// `> 5` to mean "more than the listed threshold"; we treat it as abundant
/// stock at this value unless the layout overrides it.
pub const DEFAULT_THRESHOLD_SUBSTITUTE: u32 = 10;

/// Number of artifact versions retained per storage prefix. Older objects
/// are pruned on every publish.
pub const KEEP_LAST_VERSIONS: usize = 5;

/// Default rounding precision for EUR prices (decimal digits).
pub const DEFAULT_EUR_DIGITS: u32 = 2;

/// Default rounding precision for UAH prices (decimal digits).
pub const DEFAULT_UAH_DIGITS: u32 = 0;

/// Default CSV field delimiter for exported artifacts.
pub const DEFAULT_CSV_DELIMITER: char = ';';

/// National Bank of Ukraine EUR rate endpoint consumed by the exchange
/// adapter.
pub const NBU_EUR_RATE_URL: &str =
    "https://bank.gov.ua/NBUStatService/v1/statdirectory/exchange?valcode=EUR&json";

/// Timeout for the exchange-rate HTTP call, in seconds. On timeout the
/// configured fallback rate is used.
pub const RATE_TIMEOUT_SECS: u64 = 5;

/// Default exchange-rate parameters: add-on over the official rate, floor,
/// and the fallback used when the provider is unreachable.
pub const DEFAULT_RATE_ADD_UAH: f64 = 1.0;
pub const DEFAULT_RATE_FLOOR: f64 = 49.0;
pub const DEFAULT_RATE_FALLBACK: f64 = 50.0;

/// Filename prefix for exported price artifacts.
pub const ARTIFACT_FILE_PREFIX: &str = "price";
