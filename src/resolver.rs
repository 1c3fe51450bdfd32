//! Parameterized fetch-and-decide for one [`Query`].

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::error::FetchError;
use crate::fetcher::ResilientFetcher;
use crate::providers::binance::MAX_KLINES;
use crate::providers::clock::eastern_to_utc_ms;
use crate::providers::sportsdata::{self, GameStatus};
use crate::providers::{self, candle_endpoints, close_at, dexscreener, parse_candles};
use crate::rules;
use crate::types::{Candle, CandleFeed, PriceFeed, Query, Tier, Verdict};

/// Upper bound on kline pages for one query (1000 rows each). A window
/// needing more fails with [`FetchError::Truncated`].
const MAX_PAGES: usize = 50;

/// Verdict plus the endpoint tiers that served each fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub verdict: Verdict,
    pub tiers: Vec<Tier>,
}

impl Resolution {
    fn new(verdict: Verdict, tiers: Vec<Tier>) -> Self {
        Self { verdict, tiers }
    }
}

pub struct Resolver {
    fetcher: ResilientFetcher,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self, FetchError> {
        let fetcher = ResilientFetcher::new(&config.http)?;
        Ok(Self { fetcher, config })
    }

    /// Resolve, keeping fetch failures distinct from inconclusive data
    pub async fn resolve(&self, query: &Query) -> Result<Resolution, FetchError> {
        match query {
            Query::PriceThreshold {
                feed,
                start,
                end,
                field,
                op,
                threshold,
            } => {
                let start_ms = eastern_to_utc_ms(start)?;
                let end_ms = eastern_to_utc_ms(end)?;
                let (candles, tiers) = self.fetch_candles(feed, start_ms, end_ms).await?;

                if let Some(i) = rules::first_crossing(&candles, *field, *op, *threshold) {
                    info!(
                        "[RESOLVE] {} first crossed {} {} at candle {}",
                        feed, op, threshold, candles[i].open_time_ms
                    );
                }
                let verdict = rules::threshold_crossing(&candles, *field, *op, *threshold);
                Ok(Resolution::new(verdict, tiers))
            }

            Query::PriceDirection {
                feed,
                t1,
                t2,
                tie_break,
            } => {
                let t1_ms = eastern_to_utc_ms(t1)?;
                let t2_ms = eastern_to_utc_ms(t2)?;
                let step = providers::interval_ms(feed)?;
                let first = candle_endpoints(&self.config, feed, t1_ms, t1_ms + step);
                let second = candle_endpoints(&self.config, feed, t2_ms, t2_ms + step);

                let (r1, r2) = self.fetcher.fetch_both(&first, &second).await?;
                let p1 = close_at(&parse_candles(feed, &r1.payload), t1_ms);
                let p2 = close_at(&parse_candles(feed, &r2.payload), t2_ms);
                info!("[RESOLVE] {} close t1={:?} t2={:?}", feed, p1, p2);

                let verdict = rules::two_point(p1, p2, *tie_break);
                Ok(Resolution::new(verdict, vec![r1.tier, r2.tier]))
            }

            Query::PriceGate {
                feed,
                op,
                threshold,
            } => {
                let (price, tier) = self.fetch_price(feed).await?;
                info!("[RESOLVE] price {:?} {} {}", price, op, threshold);
                Ok(Resolution::new(
                    rules::single_point(price, *op, *threshold),
                    vec![tier],
                ))
            }

            Query::GameWinner {
                league,
                date,
                home,
                away,
                expected_winner,
            } => {
                let key = self.config.sports_api_key(*league)?;
                let pair =
                    sportsdata::games_by_date_endpoints(&self.config.sportsdata, key, *league, date);
                let result = self.fetcher.fetch(&pair).await?;
                let games = sportsdata::parse_games(*league, &result.payload);
                debug!("[RESOLVE] {} games on {}: {}", league, date, games.len());

                let verdict = rules::game_winner(&games, home, away, expected_winner);
                Ok(Resolution::new(verdict, vec![result.tier]))
            }

            Query::PlayerStat {
                league,
                date,
                home,
                away,
                player,
                stat,
                op,
                threshold,
            } => {
                let key = self.config.sports_api_key(*league)?;
                let pair =
                    sportsdata::games_by_date_endpoints(&self.config.sportsdata, key, *league, date);
                let games_result = self.fetcher.fetch(&pair).await?;
                let games = sportsdata::parse_games(*league, &games_result.payload);
                let mut tiers = vec![games_result.tier];

                let game = sportsdata::find_game(&games, home, away);
                let game_id = match game {
                    Some(g) if g.status == GameStatus::Final => g.game_id,
                    Some(g) => {
                        info!("[RESOLVE] {} @ {} not final ({:?})", away, home, g.status);
                        None
                    }
                    None => {
                        info!("[RESOLVE] no {} game {} @ {} on {}", league, away, home, date);
                        None
                    }
                };
                let Some(game_id) = game_id else {
                    return Ok(Resolution::new(Verdict::Insufficient, tiers));
                };

                let pair = sportsdata::player_stats_endpoints(
                    &self.config.sportsdata,
                    key,
                    *league,
                    game_id,
                );
                let stats_result = self.fetcher.fetch(&pair).await?;
                tiers.push(stats_result.tier);
                let lines = sportsdata::parse_player_lines(&stats_result.payload);

                let verdict = rules::player_stat_gate(&lines, player, stat, *op, *threshold);
                Ok(Resolution::new(verdict, tiers))
            }
        }
    }

    /// Resolve and map any failure to [`Verdict::Insufficient`]
    pub async fn resolve_or_degrade(&self, query: &Query) -> Verdict {
        match self.resolve(query).await {
            Ok(resolution) => {
                debug!("[RESOLVE] served by {:?}", resolution.tiers);
                resolution.verdict
            }
            Err(e) => {
                warn!("[RESOLVE] Could not determine outcome: {}", e);
                Verdict::Insufficient
            }
        }
    }

    /// Candles in [start_ms, end_ms). Binance caps rows per request, so
    /// its klines are paged forward by open time until the window is covered
    /// or a page comes back short or empty.
    async fn fetch_candles(
        &self,
        feed: &CandleFeed,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<(Vec<Candle>, Vec<Tier>), FetchError> {
        let step = providers::interval_ms(feed)?;
        let mut candles: Vec<Candle> = Vec::new();
        let mut tiers = Vec::new();
        let mut cursor = start_ms;
        let mut pages = 0;

        loop {
            if pages == MAX_PAGES {
                warn!(
                    "[RESOLVE] {} still short of {} after {} pages ({} candles)",
                    feed,
                    end_ms,
                    pages,
                    candles.len()
                );
                return Err(FetchError::Truncated(pages));
            }

            let pair = candle_endpoints(&self.config, feed, cursor, end_ms);
            let result = match self.fetcher.fetch(&pair).await {
                Ok(result) => result,
                // Nothing past the previous page: the series ends there
                Err(e) if pages > 0 && e.is_empty_payload() => {
                    debug!("[RESOLVE] {} has no candles from {}", feed, cursor);
                    break;
                }
                Err(e) => return Err(e),
            };
            pages += 1;
            tiers.push(result.tier);

            let batch = parse_candles(feed, &result.payload);
            let full_page = batch.len() >= MAX_KLINES as usize;
            let Some(last_open) = batch.last().map(|c| c.open_time_ms) else {
                break;
            };
            candles.extend(batch);

            if !matches!(feed, CandleFeed::Binance { .. }) || !full_page {
                break;
            }
            if last_open + step >= end_ms {
                break;
            }
            cursor = last_open + 1;
        }

        candles.sort_by_key(|c| c.open_time_ms);
        candles.dedup_by_key(|c| c.open_time_ms);
        candles.retain(|c| c.open_time_ms < end_ms);
        debug!(
            "[RESOLVE] {} candles for {} in {} pages",
            candles.len(),
            feed,
            pages
        );
        Ok((candles, tiers))
    }

    async fn fetch_price(&self, feed: &PriceFeed) -> Result<(Option<Decimal>, Tier), FetchError> {
        match feed {
            PriceFeed::CandleClose { feed, at } => {
                let at_ms = eastern_to_utc_ms(at)?;
                let step = providers::interval_ms(feed)?;
                let pair = candle_endpoints(&self.config, feed, at_ms, at_ms + step);
                let result = self.fetcher.fetch(&pair).await?;
                let candles = parse_candles(feed, &result.payload);
                Ok((close_at(&candles, at_ms), result.tier))
            }
            PriceFeed::Dexscreener { chain, pair } => {
                let endpoints = dexscreener::pair_endpoints(&self.config.dexscreener, chain, pair);
                let result = self.fetcher.fetch(&endpoints).await?;
                Ok((dexscreener::price_usd(&result.payload), result.tier))
            }
        }
    }
}
