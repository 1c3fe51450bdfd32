//! Hyperliquid `info` candle snapshots.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ProviderEndpoint;
use crate::types::{Candle, EndpointPair, Request};

/// Candle object as returned by `candleSnapshot`; prices arrive as strings
#[derive(Debug, Deserialize)]
struct SnapshotCandle {
    t: i64,
    o: Decimal,
    h: Decimal,
    l: Decimal,
    c: Decimal,
}

impl From<SnapshotCandle> for Candle {
    fn from(c: SnapshotCandle) -> Self {
        Candle {
            open_time_ms: c.t,
            open: c.o,
            high: c.h,
            low: c.l,
            close: c.c,
        }
    }
}

/// `candleSnapshot` request for candles opening in [start_ms, end_ms)
pub fn candles_endpoints(
    endpoint: &ProviderEndpoint,
    coin: &str,
    interval: &str,
    start_ms: i64,
    end_ms: i64,
) -> EndpointPair {
    let body = json!({
        "type": "candleSnapshot",
        "req": {
            "coin": coin,
            "interval": interval,
            "startTime": start_ms,
            // endTime is inclusive, as on Binance
            "endTime": end_ms.saturating_sub(1),
        }
    });
    endpoint.pair(|base| Request::get(format!("{}/info", base)).with_json_body(body.clone()))
}

/// Parse `{"t": openTime, "o", "h", "l", "c", ...}` objects. Also accepts the
/// array wrapped in a `candles` key.
pub fn parse_candles(payload: &Value) -> Vec<Candle> {
    let rows = payload
        .as_array()
        .or_else(|| payload.get("candles").and_then(Value::as_array));

    rows.map(|rows| rows.iter().filter_map(parse_candle).collect())
        .unwrap_or_default()
}

fn parse_candle(row: &Value) -> Option<Candle> {
    SnapshotCandle::deserialize(row).ok().map(Candle::from)
}
