//! Yahoo Finance chart API client
//!
//! Fetches daily bars from `/v8/finance/chart/{symbol}`.
//!
//! Features:
//! - Request timeout on the underlying HTTP client
//! - Sliding-window rate limiting
//! - Exponential backoff with jitter on network, 429 and 5xx errors
//! - No retry for unknown symbols (404 / "Not Found")

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration as StdDuration, SystemTime};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RATE_LIMIT_PER_SECOND, DEFAULT_TIMEOUT_SECS, YAHOO_BASE_URL};
use crate::error::{AppError, Result};
use crate::models::Observation;
use crate::services::provider::{FetchRange, MarketDataProvider};

/// `period1` for a full-history request (1900-01-01). The chart API
/// returns coarse bars for `range=max`, so the window is spelled out.
const FULL_HISTORY_PERIOD1: i64 = -2_208_988_800;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Connection settings for the chart API
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Requests allowed within one `rate_limit_window_ms`
    pub requests_per_window: u32,
    pub rate_limit_window_ms: u64,
    /// First retry waits about this long, doubling on each further attempt
    pub retry_base_delay_ms: u64,
    /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: YAHOO_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            requests_per_window: DEFAULT_RATE_LIMIT_PER_SECOND,
            rate_limit_window_ms: 1000,
            retry_base_delay_ms: 1000,
            use_system_proxy: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    /// Absent when the requested window holds no bars
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Turn a chart API body into observations, oldest first
///
/// Bars without a close price are skipped; a missing volume becomes 0.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<Vec<Observation>> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Parse(format!("Failed to parse chart response for {}: {}", symbol, e)))?;

    if let Some(err) = response.chart.error {
        let description = err.description.unwrap_or_default();
        if err.code.eq_ignore_ascii_case("Not Found") {
            return Err(AppError::NotFound(format!("{}: {}", symbol, description)));
        }
        return Err(AppError::Other(format!("{} ({}): {}", symbol, err.code, description)));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or_else(|| AppError::Parse(format!("Chart response for {} has no result", symbol)))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut observations = Vec::with_capacity(timestamps.len());
    for (idx, ts) in timestamps.iter().enumerate() {
        let close = match quote.close.get(idx).copied().flatten() {
            Some(c) if c.is_finite() => c,
            _ => {
                debug!("{}: no close at {}, skipping bar", symbol, ts);
                continue;
            }
        };
        let time = match DateTime::from_timestamp(*ts, 0) {
            Some(dt) => dt,
            None => {
                warn!("{}: invalid timestamp {}", symbol, ts);
                continue;
            }
        };
        let volume = quote.volume.get(idx).copied().flatten();
        observations.push(Observation::new(time, close, volume));
    }

    observations.sort_by_key(|o| o.time);
    Ok(observations)
}

/// Yahoo Finance client with rate limiting and retry logic
pub struct YahooFinanceClient {
    client: Client,
    config: ProviderConfig,
    request_timestamps: Vec<SystemTime>,
}

impl YahooFinanceClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid base_url: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let mut builder = Client::builder().timeout(StdDuration::from_secs(config.timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created YahooFinanceClient: base_url='{}'", base_url);

        Ok(Self {
            client,
            config: ProviderConfig { base_url, ..config },
            request_timestamps: Vec::new(),
        })
    }

    /// Build the chart URL for a symbol and range
    fn chart_url(&self, symbol: &str, range: FetchRange) -> String {
        let now = Utc::now().timestamp();
        let window = match range {
            FetchRange::Max => format!("period1={}&period2={}", FULL_HISTORY_PERIOD1, now),
            FetchRange::RecentDays(days) => format!("range={}d", days),
            FetchRange::Since(start) => format!("period1={}&period2={}", start.timestamp(), now),
        };
        format!(
            "{}/v8/finance/chart/{}?interval=1d&includePrePost=false&{}",
            self.config.base_url, symbol, window
        )
    }

    /// Hold the next request until the sliding window has room for it
    async fn enforce_rate_limit(&mut self) {
        let window = StdDuration::from_millis(self.config.rate_limit_window_ms);
        let age = |sent: &SystemTime| SystemTime::now().duration_since(*sent).unwrap_or_default();

        self.request_timestamps.retain(|sent| age(sent) < window);

        let budget = self.config.requests_per_window.max(1) as usize;
        if self.request_timestamps.len() >= budget {
            let oldest_age = self.request_timestamps.first().map(age).unwrap_or(window);
            if let Some(wait_time) = window.checked_sub(oldest_age) {
                debug!("Rate limit window full ({} requests), waiting {:?}", budget, wait_time);
                sleep(wait_time + StdDuration::from_millis(100)).await;
            }
            self.request_timestamps.remove(0);
        }

        self.request_timestamps.push(SystemTime::now());
    }

    /// Exponential backoff with jitter before retry number `attempt`
    fn retry_delay(&self, attempt: u32) -> StdDuration {
        let base = self.config.retry_base_delay_ms as f64 / 1000.0;
        let factor = 2.0_f64.powi(attempt as i32 - 1) + rand::random::<f64>();
        StdDuration::from_secs_f64(base * factor).min(StdDuration::from_secs(60))
    }

    /// GET a chart URL, retrying transient failures with backoff
    async fn make_request(&mut self, symbol: &str, url: &str) -> Result<String> {
        let max_retries = self.config.max_retries.max(1);
        let mut last_error = AppError::Network("no attempt made".to_string());

        for attempt in 0..max_retries {
            self.enforce_rate_limit().await;

            if attempt > 0 {
                let delay = self.retry_delay(attempt);
                info!(
                    "Yahoo Finance retry backoff for {}: attempt {}/{}, waiting {:.1}s",
                    symbol,
                    attempt + 1,
                    max_retries,
                    delay.as_secs_f64()
                );
                sleep(delay).await;
            }

            let user_agent = USER_AGENTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(USER_AGENTS[0]);

            debug!("Fetching chart data: {}", url);
            let response = match self.client.get(url).header("User-Agent", user_agent).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!("Request for {} failed (attempt {}): {}", symbol, attempt + 1, e);
                    last_error = AppError::from(e);
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                match response.text().await {
                    Ok(body) => return Ok(body),
                    Err(e) => {
                        warn!("Failed to read response body for {} (attempt {}): {}", symbol, attempt + 1, e);
                        last_error = AppError::from(e);
                        continue;
                    }
                }
            }

            if status == StatusCode::NOT_FOUND {
                // Body carries the chart error ("No data found, symbol may be delisted")
                let body = response.text().await.unwrap_or_default();
                return match parse_chart_response(symbol, &body) {
                    Err(e) => Err(e),
                    Ok(_) => Err(AppError::NotFound(symbol.to_string())),
                };
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!("Rate limited by Yahoo Finance ({}), retrying...", status);
                last_error = AppError::RateLimit;
                continue;
            }

            if status.is_server_error() {
                warn!("Server error ({}) for {}, retrying...", status, symbol);
                last_error = AppError::Network(format!("HTTP error: {}", status));
                continue;
            }

            return Err(AppError::Network(format!("HTTP error: {}", status)));
        }

        if last_error.is_retryable() {
            warn!("Giving up on {} after {} attempts", symbol, max_retries);
        }
        Err(last_error)
    }
}

impl MarketDataProvider for YahooFinanceClient {
    async fn fetch_history(&mut self, symbol: &str, range: FetchRange) -> Result<Vec<Observation>> {
        let url = self.chart_url(symbol, range);
        let body = self.make_request(symbol, &url).await?;
        let mut observations = parse_chart_response(symbol, &body)?;

        if let FetchRange::Since(start) = range {
            observations.retain(|o| o.time >= start);
        }

        info!("Fetched {} daily records for {} ({})", observations.len(), symbol, range);
        Ok(observations)
    }
}
