//! Constants shared across the service.

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/burn_monitor.json";

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "BURN_MONITOR_CONFIG";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

pub const DEFAULT_ERROR_BACKOFF_MS: u64 = 60_000;

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_MAX_BLOCK_RANGE: u64 = 10_000;

pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

pub const DEFAULT_EXPLORER_TX_URL: &str = "https://etherscan.io/tx/";

pub const DEFAULT_RATE_URL: &str = "https://markets.api.bitcoin.com/rates/convertor/?q=USD&c=VERSE";

pub const DEFAULT_CIRCULATING_SUPPLY_URL: &str =
	"https://markets.api.bitcoin.com/coin/data/circulating?c=VERSE";

pub const DEFAULT_DEPOSIT_PREFIX: &str = "🚀 Burn Engine Deposit";

pub const DEFAULT_BURN_PREFIX: &str = "🔥💥 Tokens Burned";

/// Prefix of every message sent to the operator channel
pub const ALERT_PREFIX: &str = "🚨 Alert: ";

/// Number of burns listed by the "last burns" query
pub const LAST_BURNS_COUNT: usize = 5;
