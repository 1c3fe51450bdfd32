//! Binance REST klines endpoint.

use serde_json::Value;

use crate::config::ProviderEndpoint;
use crate::types::{decimal_from_json, Candle, EndpointPair, Request};

/// Binance returns at most this many rows per request
pub const MAX_KLINES: u32 = 1000;

/// Klines opening in [start_ms, end_ms), at most [`MAX_KLINES`] rows
pub fn klines_endpoints(
    endpoint: &ProviderEndpoint,
    api_key: Option<&str>,
    symbol: &str,
    interval: &str,
    start_ms: i64,
    end_ms: i64,
) -> EndpointPair {
    endpoint.pair(|base| {
        let request = Request::get(format!("{}/api/v3/klines", base))
            .with_query("symbol", symbol)
            .with_query("interval", interval)
            .with_query("startTime", start_ms)
            // endTime is inclusive on Binance
            .with_query("endTime", end_ms.saturating_sub(1))
            .with_query("limit", MAX_KLINES);
        match api_key {
            Some(key) => request.with_header("X-MBX-APIKEY", key),
            None => request,
        }
    })
}

/// Parse `[openTime, open, high, low, close, ...]` rows
pub fn parse_klines(payload: &Value) -> Vec<Candle> {
    payload
        .as_array()
        .map(|rows| rows.iter().filter_map(parse_kline_row).collect())
        .unwrap_or_default()
}

fn parse_kline_row(row: &Value) -> Option<Candle> {
    let row = row.as_array()?;
    if row.len() < 5 {
        return None;
    }

    Some(Candle {
        open_time_ms: row[0].as_i64()?,
        open: decimal_from_json(&row[1])?,
        high: decimal_from_json(&row[2])?,
        low: decimal_from_json(&row[3])?,
        close: decimal_from_json(&row[4])?,
    })
}
