pub mod provider;
pub mod snapshot_store;
pub mod updater;
pub mod yahoo_finance;

pub use provider::{FetchRange, MarketDataProvider};
pub use updater::{AssetStatus, UpdateConfig, UpdateReport, Updater};
pub use yahoo_finance::{ProviderConfig, YahooFinanceClient};
