//! Configuration and hardcoded market definitions.
//!
//! Environment is read once at startup via [`ResolverConfig::from_env`].

use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{
    CandleFeed, CandleField, Comparison, EndpointPair, Label, League, Market, OutcomeLabels,
    PriceFeed, Query, Request, TieBreak,
};

/// Per-request HTTP timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_USER_AGENT: &str = "market-resolver/0.1";

pub const BINANCE_BASE_URL: &str = "https://api.binance.com";
pub const SPORTS_DATA_BASE_URL: &str = "https://api.sportsdata.io/v3";
pub const DEXSCREENER_BASE_URL: &str = "https://api.dexscreener.com";
pub const HYPERLIQUID_BASE_URL: &str = "https://api.hyperliquid.xyz";

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn from_env() -> Self {
        Self {
            timeout: Duration::from_secs(
                env_var("REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(REQUEST_TIMEOUT_SECS),
            ),
            user_agent: env_var("HTTP_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.into()),
        }
    }
}

/// Vendor base URL plus an optional proxy mirror serving the same paths.
/// When a mirror is set it is tried first and the vendor becomes the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub base_url: String,
    pub proxy_url: Option<String>,
}

impl ProviderEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            proxy_url: None,
        }
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    fn from_env(base_var: &str, proxy_var: &str, default_base: &str) -> Self {
        Self {
            base_url: env_var(base_var).unwrap_or_else(|| default_base.to_string()),
            proxy_url: env_var(proxy_var),
        }
    }

    /// Build the endpoint pair for one logical request. `build` receives a
    /// base URL without trailing slash.
    pub fn pair(&self, build: impl Fn(&str) -> Request) -> EndpointPair {
        let vendor = build(self.base_url.trim_end_matches('/'));
        match &self.proxy_url {
            Some(proxy) => EndpointPair {
                primary: build(proxy.trim_end_matches('/')),
                fallback: Some(vendor),
            },
            None => EndpointPair {
                primary: vendor,
                fallback: None,
            },
        }
    }
}

/// Everything the resolver needs from the environment
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub http: HttpConfig,
    pub binance: ProviderEndpoint,
    pub sportsdata: ProviderEndpoint,
    pub dexscreener: ProviderEndpoint,
    pub hyperliquid: ProviderEndpoint,
    pub binance_api_key: Option<String>,
    pub sports_api_keys: HashMap<League, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            binance: ProviderEndpoint::new(BINANCE_BASE_URL),
            sportsdata: ProviderEndpoint::new(SPORTS_DATA_BASE_URL),
            dexscreener: ProviderEndpoint::new(DEXSCREENER_BASE_URL),
            hyperliquid: ProviderEndpoint::new(HYPERLIQUID_BASE_URL),
            binance_api_key: None,
            sports_api_keys: HashMap::new(),
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        let sports_api_keys = League::ALL
            .iter()
            .filter_map(|league| env_var(league.api_key_var()).map(|key| (*league, key)))
            .collect();

        Self {
            http: HttpConfig::from_env(),
            binance: ProviderEndpoint::from_env("BINANCE_BASE_URL", "BINANCE_PROXY_URL", BINANCE_BASE_URL),
            sportsdata: ProviderEndpoint::from_env(
                "SPORTS_DATA_BASE_URL",
                "SPORTS_DATA_PROXY_URL",
                SPORTS_DATA_BASE_URL,
            ),
            dexscreener: ProviderEndpoint::from_env(
                "DEXSCREENER_BASE_URL",
                "DEXSCREENER_PROXY_URL",
                DEXSCREENER_BASE_URL,
            ),
            hyperliquid: ProviderEndpoint::from_env(
                "HYPERLIQUID_BASE_URL",
                "HYPERLIQUID_PROXY_URL",
                HYPERLIQUID_BASE_URL,
            ),
            binance_api_key: env_var("BINANCE_API_KEY"),
            sports_api_keys,
        }
    }

    pub fn sports_api_key(&self, league: League) -> Result<&str, ConfigError> {
        self.sports_api_keys
            .get(&league)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingVar(league.api_key_var().to_string()))
    }
}

/// Unset and blank variables are treated the same
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Hardcoded market table
pub fn get_hardcoded_markets() -> Vec<Market> {
    vec![
        Market {
            id: "btc-dip-95k-jan15".into(),
            description: "Bitcoin dips to $95,000 on Jan 15 (ET)".into(),
            query: Query::PriceThreshold {
                feed: CandleFeed::Binance {
                    symbol: "BTCUSDT".into(),
                    interval: "1m".into(),
                },
                start: "2025-01-15 00:00".into(),
                end: "2025-01-16 00:00".into(),
                field: CandleField::Low,
                op: Comparison::Le,
                threshold: dec!(95000),
            },
            labels: OutcomeLabels::default(),
        },
        Market {
            id: "eth-up-or-down-jan15-noon".into(),
            description: "ETH up or down, Jan 15 11AM-12PM ET".into(),
            query: Query::PriceDirection {
                feed: CandleFeed::Binance {
                    symbol: "ETHUSDT".into(),
                    interval: "1m".into(),
                },
                t1: "2025-01-15 11:00".into(),
                t2: "2025-01-15 12:00".into(),
                tie_break: TieBreak::Dedicated,
            },
            labels: OutcomeLabels::default(),
        },
        Market {
            id: "sol-up-or-down-jan15-1pm".into(),
            description: "SOL up or down, Jan 15 12PM-1PM ET (ties resolve up)".into(),
            query: Query::PriceDirection {
                feed: CandleFeed::Binance {
                    symbol: "SOLUSDT".into(),
                    interval: "1m".into(),
                },
                t1: "2025-01-15 12:00".into(),
                t2: "2025-01-15 13:00".into(),
                tie_break: TieBreak::Up,
            },
            labels: OutcomeLabels::default(),
        },
        Market {
            id: "sol-above-200-jan15".into(),
            description: "SOL closes at or above $200 at 12PM ET Jan 15".into(),
            query: Query::PriceGate {
                feed: PriceFeed::CandleClose {
                    feed: CandleFeed::Binance {
                        symbol: "SOLUSDT".into(),
                        interval: "1m".into(),
                    },
                    at: "2025-01-15 12:00".into(),
                },
                op: Comparison::Ge,
                threshold: dec!(200),
            },
            labels: OutcomeLabels::default(),
        },
        Market {
            id: "hype-reach-30-jan".into(),
            description: "HYPE reaches $30 in January (Hyperliquid)".into(),
            query: Query::PriceThreshold {
                feed: CandleFeed::Hyperliquid {
                    coin: "HYPE".into(),
                    interval: "1h".into(),
                },
                start: "2025-01-01 00:00".into(),
                end: "2025-02-01 00:00".into(),
                field: CandleField::High,
                op: Comparison::Ge,
                threshold: dec!(30),
            },
            labels: OutcomeLabels::default(),
        },
        Market {
            id: "fartcoin-below-0.15".into(),
            description: "FARTCOIN trades at or below $0.15 (Dexscreener)".into(),
            query: Query::PriceGate {
                feed: PriceFeed::Dexscreener {
                    chain: "solana".into(),
                    pair: "bzc9nzfmqkxr6fz1dbph7bdf9broyef6pnzesp7v5iiu".into(),
                },
                op: Comparison::Le,
                threshold: dec!(0.15),
            },
            labels: OutcomeLabels::default(),
        },
        Market {
            id: "nba-lal-at-bos-jan15".into(),
            description: "Lakers vs. Celtics, Jan 15: Lakers win".into(),
            query: Query::GameWinner {
                league: League::Nba,
                date: "2025-01-15".into(),
                home: "BOS".into(),
                away: "LAL".into(),
                expected_winner: "LAL".into(),
            },
            labels: OutcomeLabels::default(),
        },
        Market {
            id: "mlb-nyy-at-bos-jul04".into(),
            description: "Yankees vs. Red Sox, Jul 4: Yankees win (50-50 if not played)".into(),
            query: Query::GameWinner {
                league: League::Mlb,
                date: "2025-07-04".into(),
                home: "BOS".into(),
                away: "NYY".into(),
                expected_winner: "NYY".into(),
            },
            labels: OutcomeLabels {
                tie: Label::P3,
                insufficient: Label::P3,
                ..OutcomeLabels::default()
            },
        },
        Market {
            id: "nba-lebron-over-25-jan15".into(),
            description: "LeBron James scores 25+ points vs. Celtics, Jan 15".into(),
            query: Query::PlayerStat {
                league: League::Nba,
                date: "2025-01-15".into(),
                home: "BOS".into(),
                away: "LAL".into(),
                player: "LeBron James".into(),
                stat: "Points".into(),
                op: Comparison::Ge,
                threshold: dec!(25),
            },
            labels: OutcomeLabels::default(),
        },
    ]
}

pub fn find_market(id: &str) -> Option<Market> {
    get_hardcoded_markets().into_iter().find(|m| m.id == id)
}
