//! Dexscreener pair lookups.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::config::ProviderEndpoint;
use crate::types::{EndpointPair, Request};

#[derive(Debug, Deserialize)]
struct PairsResponse {
    #[serde(default)]
    pair: Option<DexPair>,
    #[serde(default)]
    pairs: Option<Vec<DexPair>>,
}

#[derive(Debug, Deserialize)]
struct DexPair {
    #[serde(rename = "priceUsd", default)]
    price_usd: Option<Decimal>,
}

/// Lookup of one pair by chain and pair address
pub fn pair_endpoints(endpoint: &ProviderEndpoint, chain: &str, pair: &str) -> EndpointPair {
    endpoint.pair(|base| Request::get(format!("{}/latest/dex/pairs/{}/{}", base, chain, pair)))
}

/// `pair.priceUsd`, or the first entry of `pairs`. A malformed price reads
/// as absent.
pub fn price_usd(payload: &Value) -> Option<Decimal> {
    let response = PairsResponse::deserialize(payload).ok()?;
    response
        .pair
        .or_else(|| response.pairs.and_then(|pairs| pairs.into_iter().next()))?
        .price_usd
}
