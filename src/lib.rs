//! Market resolver library: resilient fetch, decision rules, outcome labels.

pub mod config;
pub mod emitter;
pub mod error;
pub mod fetcher;
pub mod providers;
pub mod resolver;
pub mod rules;
pub mod types;

pub use config::{find_market, get_hardcoded_markets, HttpConfig, ProviderEndpoint, ResolverConfig};
pub use error::{AttemptError, ConfigError, FetchError};
pub use fetcher::ResilientFetcher;
pub use resolver::{Resolution, Resolver};
pub use types::{EndpointPair, FetchResult, Label, Market, OutcomeLabels, Query, Request, Tier, Verdict};
