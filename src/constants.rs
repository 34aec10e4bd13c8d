//! Built-in asset table and provider constants

/// Default (symbol, crypto id) pairs refreshed when no `--assets` file is given.
///
/// Order matters: it is the processing order and the order of
/// `available_tokens` in the index.
pub const DEFAULT_ASSETS: &[(&str, &str)] = &[
    ("BTC-USD", "bitcoin"),
    ("ETH-USD", "ethereum"),
    ("BNB-USD", "binancecoin"),
    ("XRP-USD", "xrp"),
    ("SOL-USD", "solana"),
    ("ADA-USD", "cardano"),
    ("DOGE-USD", "dogecoin"),
    ("TRX-USD", "tron"),
    ("LINK-USD", "chainlink"),
    ("DOT-USD", "polkadot"),
    ("LTC-USD", "litecoin"),
    ("BCH-USD", "bitcoin-cash"),
    ("XLM-USD", "stellar"),
    ("ETC-USD", "ethereum-classic"),
    ("XMR-USD", "monero"),
    ("AVAX-USD", "avalanche"),
    ("SHIB-USD", "shiba-inu"),
    ("ATOM-USD", "cosmos"),
    ("NEAR-USD", "near"),
    ("ALGO-USD", "algorand"),
    ("VET-USD", "vechain"),
    ("ICP-USD", "internet-computer"),
    ("HBAR-USD", "hedera"),
    ("QNT-USD", "quant"),
    ("FIL-USD", "filecoin"),
    ("AAVE-USD", "aave"),
];

/// Label written to `index.json`
pub const DATA_SOURCE: &str = "Yahoo Finance";

/// Quote-currency suffix stripped from a symbol to build its display name
pub const QUOTE_SUFFIX: &str = "-USD";

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "public/data";

/// Index file name inside the data directory
pub const INDEX_FILENAME: &str = "index.json";

/// Symbol queried by `latest` when none is given
pub const DEFAULT_LATEST_SYMBOL: &str = "BTC-USD";

/// Window (in days) queried by `latest`
pub const DEFAULT_LATEST_DAYS: u32 = 5;

/// Yahoo Finance chart endpoint
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Request timeout for provider calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum attempts per provider call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Provider calls allowed per second
pub const DEFAULT_RATE_LIMIT_PER_SECOND: u32 = 2;
