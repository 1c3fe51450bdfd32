//! Decision rules: pure mappings from fetched data to a [`Verdict`].
//!
//! None of these read the clock or any other hidden input, and none of them
//! fail; missing data yields [`Verdict::Insufficient`].

use rust_decimal::Decimal;

use crate::providers::sportsdata::{find_game, Game, GameStatus, PlayerLine};
use crate::types::{decimal_from_json, Candle, CandleField, Comparison, TieBreak, Verdict};

/// Index of the first candle, in chronological order, whose `field` satisfies
/// `op` against `threshold`
pub fn first_crossing(
    candles: &[Candle],
    field: CandleField,
    op: Comparison,
    threshold: Decimal,
) -> Option<usize> {
    candles
        .iter()
        .position(|c| op.holds(c.field(field), threshold))
}

/// `Yes` if any candle crosses, `No` if none does, `Insufficient` for an
/// empty series
pub fn threshold_crossing(
    candles: &[Candle],
    field: CandleField,
    op: Comparison,
    threshold: Decimal,
) -> Verdict {
    if candles.is_empty() {
        return Verdict::Insufficient;
    }
    match first_crossing(candles, field, op, threshold) {
        Some(_) => Verdict::Yes,
        None => Verdict::No,
    }
}

/// Up (`Yes`) if t2 > t1, down (`No`) if t2 < t1
pub fn two_point(t1: Option<Decimal>, t2: Option<Decimal>, tie_break: TieBreak) -> Verdict {
    let (Some(t1), Some(t2)) = (t1, t2) else {
        return Verdict::Insufficient;
    };
    match t2.cmp(&t1) {
        std::cmp::Ordering::Greater => Verdict::Yes,
        std::cmp::Ordering::Less => Verdict::No,
        std::cmp::Ordering::Equal => match tie_break {
            TieBreak::Dedicated => Verdict::Tie,
            TieBreak::Up => Verdict::Yes,
            TieBreak::Down => Verdict::No,
        },
    }
}

/// Binary gate on one value; a missing value is `Insufficient`
pub fn single_point(value: Option<Decimal>, op: Comparison, threshold: Decimal) -> Verdict {
    match value {
        Some(v) if op.holds(v, threshold) => Verdict::Yes,
        Some(_) => Verdict::No,
        None => Verdict::Insufficient,
    }
}

/// Did `expected_winner` win the final game between `home` and `away`.
/// Unplayed, unfinished or missing games are `Insufficient`, as is an
/// `expected_winner` that is neither team.
pub fn game_winner(games: &[Game], home: &str, away: &str, expected_winner: &str) -> Verdict {
    if !expected_winner.eq_ignore_ascii_case(home) && !expected_winner.eq_ignore_ascii_case(away) {
        return Verdict::Insufficient;
    }
    let Some(game) = find_game(games, home, away) else {
        return Verdict::Insufficient;
    };
    if game.status != GameStatus::Final {
        return Verdict::Insufficient;
    }
    let (Some(home_score), Some(away_score)) = (game.home_score, game.away_score) else {
        return Verdict::Insufficient;
    };

    let winner = match home_score.cmp(&away_score) {
        std::cmp::Ordering::Greater => &game.home_team,
        std::cmp::Ordering::Less => &game.away_team,
        std::cmp::Ordering::Equal => return Verdict::Tie,
    };
    if winner.eq_ignore_ascii_case(expected_winner) {
        Verdict::Yes
    } else {
        Verdict::No
    }
}

/// Gate on one stat of the named player (case-insensitive); absent player or
/// stat is `Insufficient`
pub fn player_stat_gate(
    lines: &[PlayerLine],
    player: &str,
    stat: &str,
    op: Comparison,
    threshold: Decimal,
) -> Verdict {
    let player = player.trim();
    let value = lines
        .iter()
        .find(|line| line.name.trim().eq_ignore_ascii_case(player))
        .and_then(|line| line.stats.get(stat))
        .and_then(decimal_from_json);
    single_point(value, op, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::binance::parse_klines;
    use crate::providers::sportsdata::{parse_games, parse_player_lines};
    use crate::types::League;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn candle(t: i64, low: Decimal, high: Decimal) -> Candle {
        Candle {
            open_time_ms: t,
            open: low,
            high,
            low,
            close: high,
        }
    }

    #[test]
    fn test_low_equal_to_threshold_crosses() {
        let candles = parse_klines(&json!([[0, "100", "105", "95", "102"]]));
        assert_eq!(
            threshold_crossing(&candles, CandleField::Low, Comparison::Le, dec!(95)),
            Verdict::Yes
        );
    }

    #[test]
    fn test_first_crossing_wins() {
        let candles = vec![
            candle(0, dec!(0.20), dec!(0.25)),
            candle(60_000, dec!(0.15), dec!(0.18)),
            candle(120_000, dec!(0.10), dec!(0.12)),
        ];
        assert_eq!(
            first_crossing(&candles, CandleField::Low, Comparison::Le, dec!(0.15)),
            Some(1)
        );
        assert_eq!(
            threshold_crossing(&candles, CandleField::High, Comparison::Ge, dec!(0.30)),
            Verdict::No
        );
        assert_eq!(
            threshold_crossing(&[], CandleField::Low, Comparison::Le, dec!(1)),
            Verdict::Insufficient
        );
    }

    #[test]
    fn test_two_point() {
        assert_eq!(two_point(Some(dec!(100.0)), Some(dec!(100.0)), TieBreak::Dedicated), Verdict::Tie);
        assert_eq!(two_point(Some(dec!(100)), Some(dec!(100.01)), TieBreak::Dedicated), Verdict::Yes);
        assert_eq!(two_point(Some(dec!(100)), Some(dec!(99.99)), TieBreak::Dedicated), Verdict::No);
        assert_eq!(two_point(Some(dec!(5)), Some(dec!(5)), TieBreak::Up), Verdict::Yes);
        assert_eq!(two_point(Some(dec!(5)), Some(dec!(5)), TieBreak::Down), Verdict::No);
        assert_eq!(two_point(None, Some(dec!(5)), TieBreak::Dedicated), Verdict::Insufficient);
    }

    #[test]
    fn test_rules_are_deterministic() {
        let candles = vec![candle(0, dec!(1), dec!(2)), candle(1, dec!(0.5), dec!(1.5))];
        let first = threshold_crossing(&candles, CandleField::Low, Comparison::Le, dec!(0.5));
        for _ in 0..10 {
            assert_eq!(
                threshold_crossing(&candles, CandleField::Low, Comparison::Le, dec!(0.5)),
                first
            );
        }
    }

    #[test]
    fn test_single_point_exact_decimal() {
        // 0.1 + 0.05 is not 0.15 in binary floating point
        let value = dec!(0.1) + dec!(0.05);
        assert_eq!(single_point(Some(value), Comparison::Le, dec!(0.15)), Verdict::Yes);
        assert_eq!(single_point(Some(dec!(0.16)), Comparison::Le, dec!(0.15)), Verdict::No);
        assert_eq!(single_point(None, Comparison::Le, dec!(0.15)), Verdict::Insufficient);
    }

    #[test]
    fn test_game_winner() {
        let games = parse_games(
            League::Nba,
            &json!([
                {"GameID": 1, "HomeTeam": "BOS", "AwayTeam": "LAL", "Status": "Final",
                 "HomeTeamScore": 110, "AwayTeamScore": 115},
                {"GameID": 2, "HomeTeam": "NYK", "AwayTeam": "MIA", "Status": "Postponed"},
                {"GameID": 3, "HomeTeam": "DEN", "AwayTeam": "PHX", "Status": "InProgress",
                 "HomeTeamScore": 50, "AwayTeamScore": 40}
            ]),
        );
        assert_eq!(game_winner(&games, "BOS", "LAL", "LAL"), Verdict::Yes);
        assert_eq!(game_winner(&games, "BOS", "LAL", "BOS"), Verdict::No);
        assert_eq!(game_winner(&games, "NYK", "MIA", "NYK"), Verdict::Insufficient);
        assert_eq!(game_winner(&games, "DEN", "PHX", "DEN"), Verdict::Insufficient);
        assert_eq!(game_winner(&games, "GSW", "SAC", "GSW"), Verdict::Insufficient);
        assert_eq!(game_winner(&[], "BOS", "LAL", "LAL"), Verdict::Insufficient);
    }

    #[test]
    fn test_expected_winner_outside_matchup_is_insufficient() {
        let games = parse_games(
            League::Nba,
            &json!([{"GameID": 1, "HomeTeam": "BOS", "AwayTeam": "LAL", "Status": "Final",
                     "HomeTeamScore": 110, "AwayTeamScore": 115}]),
        );
        assert_eq!(game_winner(&games, "BOS", "LAL", "GSW"), Verdict::Insufficient);
        assert_eq!(game_winner(&games, "BOS", "LAL", "lal"), Verdict::Yes);
    }

    #[test]
    fn test_tied_final_is_tie() {
        let games = parse_games(
            League::Mlb,
            &json!([{"GameID": 9, "HomeTeam": "BOS", "AwayTeam": "NYY", "Status": "Final",
                     "HomeTeamRuns": 4, "AwayTeamRuns": 4}]),
        );
        assert_eq!(game_winner(&games, "BOS", "NYY", "NYY"), Verdict::Tie);
    }

    #[test]
    fn test_player_stat_gate() {
        let lines = parse_player_lines(&json!([
            {"Name": "LeBron James", "Team": "LAL", "Points": 27.0},
            {"Name": "Jayson Tatum", "Team": "BOS", "Points": 24.0, "Assists": null}
        ]));
        assert_eq!(
            player_stat_gate(&lines, "lebron james", "Points", Comparison::Ge, dec!(25)),
            Verdict::Yes
        );
        assert_eq!(
            player_stat_gate(&lines, "Jayson Tatum", "Points", Comparison::Ge, dec!(25)),
            Verdict::No
        );
        assert_eq!(
            player_stat_gate(&lines, "Anthony Davis", "Points", Comparison::Ge, dec!(25)),
            Verdict::Insufficient
        );
        assert_eq!(
            player_stat_gate(&lines, "Jayson Tatum", "Assists", Comparison::Ge, dec!(5)),
            Verdict::Insufficient
        );
    }
}
