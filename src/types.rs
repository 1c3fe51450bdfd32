//! Core type definitions for market resolution.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Which endpoint of a pair served a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    Fallback,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Primary => write!(f, "primary"),
            Tier::Fallback => write!(f, "fallback"),
        }
    }
}

/// A single HTTP request description. A JSON body turns it into a POST.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Preferred endpoint plus at most one fallback
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointPair {
    pub primary: Request,
    pub fallback: Option<Request>,
}

/// Decoded payload from whichever endpoint succeeded
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub payload: Value,
    pub tier: Tier,
    pub fetched_at: DateTime<Utc>,
}

impl FetchResult {
    pub fn new(payload: Value, tier: Tier) -> Self {
        Self {
            payload,
            tier,
            fetched_at: Utc::now(),
        }
    }
}

/// Internal resolution result. Always distinguishes a neutral result from
/// data that could not be obtained, even when both share an external label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Condition false (or price went down)
    No,
    /// Condition true (or price went up)
    Yes,
    /// Valid data, neutral result
    Tie,
    /// Could not determine
    Insufficient,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::No => write!(f, "no"),
            Verdict::Yes => write!(f, "yes"),
            Verdict::Tie => write!(f, "tie"),
            Verdict::Insufficient => write!(f, "insufficient data"),
        }
    }
}

/// External outcome label consumed by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    P1,
    P2,
    P3,
    P4,
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::P1 => write!(f, "p1"),
            Label::P2 => write!(f, "p2"),
            Label::P3 => write!(f, "p3"),
            Label::P4 => write!(f, "p4"),
        }
    }
}

/// Per-market mapping from verdict to label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeLabels {
    pub no: Label,
    pub yes: Label,
    pub tie: Label,
    pub insufficient: Label,
}

impl Default for OutcomeLabels {
    fn default() -> Self {
        Self {
            no: Label::P1,
            yes: Label::P2,
            tie: Label::P3,
            insufficient: Label::P4,
        }
    }
}

impl OutcomeLabels {
    pub fn label(&self, verdict: Verdict) -> Label {
        match verdict {
            Verdict::No => self.no,
            Verdict::Yes => self.yes,
            Verdict::Tie => self.tie,
            Verdict::Insufficient => self.insufficient,
        }
    }
}

/// Inclusive comparison operator against a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// value <= threshold
    Le,
    /// value >= threshold
    Ge,
}

impl Comparison {
    #[inline]
    pub fn holds(self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Comparison::Le => value <= threshold,
            Comparison::Ge => value >= threshold,
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::Le => write!(f, "<="),
            Comparison::Ge => write!(f, ">="),
        }
    }
}

/// OHLC candle, normalized across providers
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time_ms: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleField {
    Open,
    High,
    Low,
    Close,
}

impl Candle {
    #[inline]
    pub fn field(&self, field: CandleField) -> Decimal {
        match field {
            CandleField::Open => self.open,
            CandleField::High => self.high,
            CandleField::Low => self.low,
            CandleField::Close => self.close,
        }
    }
}

/// How an exact two-point tie resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    #[default]
    Dedicated,
    Up,
    Down,
}

/// SportsData.io league family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    Mlb,
    Nba,
    Nhl,
    Cbb,
}

impl League {
    pub const ALL: [League; 4] = [League::Mlb, League::Nba, League::Nhl, League::Cbb];

    /// URL path segment
    pub fn path(self) -> &'static str {
        match self {
            League::Mlb => "mlb",
            League::Nba => "nba",
            League::Nhl => "nhl",
            League::Cbb => "cbb",
        }
    }

    pub fn api_key_var(self) -> &'static str {
        match self {
            League::Mlb => "SPORTS_DATA_IO_MLB_API_KEY",
            League::Nba => "SPORTS_DATA_IO_NBA_API_KEY",
            League::Nhl => "SPORTS_DATA_IO_NHL_API_KEY",
            League::Cbb => "SPORTS_DATA_IO_CBB_API_KEY",
        }
    }

    /// (home, away) score fields in GamesByDate rows
    pub fn score_fields(self) -> (&'static str, &'static str) {
        match self {
            League::Mlb => ("HomeTeamRuns", "AwayTeamRuns"),
            _ => ("HomeTeamScore", "AwayTeamScore"),
        }
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path().to_uppercase())
    }
}

/// Where candles come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandleFeed {
    Binance { symbol: String, interval: String },
    Hyperliquid { coin: String, interval: String },
}

impl std::fmt::Display for CandleFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandleFeed::Binance { symbol, interval } => write!(f, "binance:{}@{}", symbol, interval),
            CandleFeed::Hyperliquid { coin, interval } => {
                write!(f, "hyperliquid:{}@{}", coin, interval)
            }
        }
    }
}

/// Where a single price point comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceFeed {
    /// Close of the candle opening at `at` (Eastern wall-clock)
    CandleClose { feed: CandleFeed, at: String },
    Dexscreener { chain: String, pair: String },
}

/// Immutable description of what to resolve. Times are Eastern wall-clock
/// strings (`YYYY-MM-DD HH:MM`), dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Did any candle in [start, end) cross the threshold
    PriceThreshold {
        feed: CandleFeed,
        start: String,
        end: String,
        field: CandleField,
        op: Comparison,
        threshold: Decimal,
    },
    /// Close at t2 versus close at t1
    PriceDirection {
        feed: CandleFeed,
        t1: String,
        t2: String,
        tie_break: TieBreak,
    },
    /// One price compared to a constant
    PriceGate {
        feed: PriceFeed,
        op: Comparison,
        threshold: Decimal,
    },
    /// Did `expected_winner` win the game between home and away
    GameWinner {
        league: League,
        date: String,
        home: String,
        away: String,
        expected_winner: String,
    },
    /// Player stat in the game between home and away compared to a constant
    PlayerStat {
        league: League,
        date: String,
        home: String,
        away: String,
        player: String,
        stat: String,
        op: Comparison,
        threshold: Decimal,
    },
}

/// Parameter set for one market
#[derive(Debug, Clone)]
pub struct Market {
    pub id: String,
    pub description: String,
    pub query: Query,
    pub labels: OutcomeLabels,
}

/// Read a decimal from a JSON string or number
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n
            .to_string()
            .parse()
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_comparison_is_inclusive() {
        assert!(Comparison::Le.holds(dec!(95), dec!(95)));
        assert!(Comparison::Ge.holds(dec!(95), dec!(95)));
        assert!(!Comparison::Le.holds(dec!(95.01), dec!(95)));
        assert!(!Comparison::Ge.holds(dec!(94.99), dec!(95)));
    }

    #[test]
    fn test_decimal_from_json() {
        assert_eq!(decimal_from_json(&json!("0.15")), Some(dec!(0.15)));
        assert_eq!(decimal_from_json(&json!(" 102 ")), Some(dec!(102)));
        assert_eq!(decimal_from_json(&json!(27)), Some(dec!(27)));
        assert_eq!(decimal_from_json(&json!(0.1)), Some(dec!(0.1)));
        assert_eq!(decimal_from_json(&json!("n/a")), None);
        assert_eq!(decimal_from_json(&Value::Null), None);
    }

    #[test]
    fn test_labels_keep_verdicts_distinct() {
        let folded = OutcomeLabels {
            tie: Label::P3,
            insufficient: Label::P3,
            ..OutcomeLabels::default()
        };
        assert_eq!(folded.label(Verdict::Tie), folded.label(Verdict::Insufficient));
        assert_ne!(Verdict::Tie, Verdict::Insufficient);
        assert_eq!(OutcomeLabels::default().label(Verdict::Insufficient), Label::P4);
        assert_eq!(Label::P2.to_string(), "p2");
    }
}
