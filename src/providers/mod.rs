//! Provider endpoint builders and payload parsers.

pub mod binance;
pub mod clock;
pub mod dexscreener;
pub mod hyperliquid;
pub mod sportsdata;

use crate::config::ResolverConfig;
use crate::error::ConfigError;
use crate::types::{Candle, CandleFeed, EndpointPair};
use serde_json::Value;

/// Endpoint pair for candles of `feed` in [start_ms, end_ms)
pub fn candle_endpoints(
    config: &ResolverConfig,
    feed: &CandleFeed,
    start_ms: i64,
    end_ms: i64,
) -> EndpointPair {
    match feed {
        CandleFeed::Binance { symbol, interval } => binance::klines_endpoints(
            &config.binance,
            config.binance_api_key.as_deref(),
            symbol,
            interval,
            start_ms,
            end_ms,
        ),
        CandleFeed::Hyperliquid { coin, interval } => {
            hyperliquid::candles_endpoints(&config.hyperliquid, coin, interval, start_ms, end_ms)
        }
    }
}

/// Parse candles in chronological order; malformed rows are skipped
pub fn parse_candles(feed: &CandleFeed, payload: &Value) -> Vec<Candle> {
    let mut candles = match feed {
        CandleFeed::Binance { .. } => binance::parse_klines(payload),
        CandleFeed::Hyperliquid { .. } => hyperliquid::parse_candles(payload),
    };
    candles.sort_by_key(|c| c.open_time_ms);
    candles
}

/// Close of the first candle opening at or after `at_ms`
pub fn close_at(candles: &[Candle], at_ms: i64) -> Option<rust_decimal::Decimal> {
    candles
        .iter()
        .find(|c| c.open_time_ms >= at_ms)
        .map(|c| c.close)
}

/// Length of one candle in milliseconds, from interval strings like `1s`,
/// `15m`, `1h`, `1d`, `1w`. Calendar months (`1M`) have no fixed length and
/// are rejected.
pub fn interval_ms(feed: &CandleFeed) -> Result<i64, ConfigError> {
    let interval = match feed {
        CandleFeed::Binance { interval, .. } | CandleFeed::Hyperliquid { interval, .. } => interval,
    };
    let invalid = || ConfigError::InvalidInterval(interval.clone());

    let (split, _) = interval.char_indices().last().ok_or_else(invalid)?;
    let (count, unit) = interval.split_at(split);
    let unit_ms = match unit {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 7 * 86_400_000,
        _ => return Err(invalid()),
    };
    match count.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n * unit_ms),
        _ => Err(invalid()),
    }
}
