/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use super::model::{PitcherGameStat, RecentTeamPerformance, TeamGameStat};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Rounds to three decimal places, the precision stored for every feature.
/// Rounding goes by the exact decimal value of the float, so `1.0005` (stored
/// as `1.000499..`) becomes `1.0`.
fn round3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap_or(value)
}

/// Mean of `field` over the rows in `window` that have a finite value for
/// it, rounded to three decimals. `None` when no row has one.
///
/// Each field is averaged on its own, so a row missing one stat still counts
/// toward the others.
pub fn rolling_mean<R>(window: &[R], field: impl Fn(&R) -> Option<f64>) -> Option<f64> {
    let (sum, count) = window
        .iter()
        .filter_map(&field)
        .filter(|v| v.is_finite())
        .fold((0_f64, 0_u32), |(sum, count), v| (sum + v, count + 1));
    match count {
        0 => None,
        _ => Some(round3(sum / f64::from(count))),
    }
}

/// The oldest row still inside a most-recent-first window.
///
/// NOTE: display fields are taken from here, not from the newest game.
pub fn oldest_in_window<R>(window: &[R]) -> Option<&R> {
    window.last()
}

/// Rolling batting, fielding and bullpen averages for one team.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamFeature {
    pub team_id: i32,
    pub team_name: Option<String>,
    pub batting_avg: Option<f64>,
    pub obp: Option<f64>,
    pub slg: Option<f64>,
    pub ops: Option<f64>,
    pub runs_per_game: Option<f64>,
    pub strikeouts_per_game: Option<f64>,
    pub walks_per_game: Option<f64>,
    pub rbi_per_game: Option<f64>,
    pub hits_per_game: Option<f64>,
    pub left_on_base: Option<f64>,
    pub errors_per_game: Option<f64>,
    pub def_efficiency: Option<f64>,
    pub home_runs_per_game: Option<f64>,
    pub bullpen_era: Option<f64>,
    pub bullpen_whip: Option<f64>,
    pub bullpen_so9: Option<f64>,
    pub bullpen_innings_pitched: Option<f64>,
}

impl TeamFeature {
    #[must_use]
    pub fn from_window(team_id: i32, window: &[TeamGameStat]) -> TeamFeature {
        TeamFeature {
            team_id,
            team_name: oldest_in_window(window).and_then(|row| row.team_name.clone()),
            batting_avg: rolling_mean(window, |r| r.batting_avg),
            obp: rolling_mean(window, |r| r.obp),
            slg: rolling_mean(window, |r| r.slg),
            ops: rolling_mean(window, |r| r.ops),
            runs_per_game: rolling_mean(window, |r| r.runs_per_game),
            strikeouts_per_game: rolling_mean(window, |r| r.strikeouts_per_game),
            walks_per_game: rolling_mean(window, |r| r.walks_per_game),
            rbi_per_game: rolling_mean(window, |r| r.rbi_per_game),
            hits_per_game: rolling_mean(window, |r| r.hits_per_game),
            left_on_base: rolling_mean(window, |r| r.left_on_base),
            errors_per_game: rolling_mean(window, |r| r.errors_per_game),
            def_efficiency: rolling_mean(window, |r| r.def_efficiency),
            home_runs_per_game: rolling_mean(window, |r| r.home_runs_per_game),
            bullpen_era: rolling_mean(window, |r| r.bullpen_era),
            bullpen_whip: rolling_mean(window, |r| r.bullpen_whip),
            bullpen_so9: rolling_mean(window, |r| r.bullpen_so9),
            bullpen_innings_pitched: rolling_mean(window, |r| r.bullpen_innings_pitched),
        }
    }
}

/// Rolling starter averages for a team's recent starts. Fields carry a
/// `pitcher_` prefix so they can sit beside the team's bullpen columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PitcherFeature {
    pub team_id: i32,
    pub pitcher_era: Option<f64>,
    pub pitcher_whip: Option<f64>,
    pub pitcher_so9: Option<f64>,
    pub pitcher_bb9: Option<f64>,
    pub pitcher_hr9: Option<f64>,
    pub pitcher_innings_pitched: Option<f64>,
}

impl PitcherFeature {
    #[must_use]
    pub fn from_window(team_id: i32, window: &[PitcherGameStat]) -> PitcherFeature {
        PitcherFeature {
            team_id,
            pitcher_era: rolling_mean(window, |r| r.era),
            pitcher_whip: rolling_mean(window, |r| r.whip),
            pitcher_so9: rolling_mean(window, |r| r.so9),
            pitcher_bb9: rolling_mean(window, |r| r.bb9),
            pitcher_hr9: rolling_mean(window, |r| r.hr9),
            pitcher_innings_pitched: rolling_mean(window, |r| r.innings_pitched),
        }
    }
}

/// Left-joins pitcher features onto team features by team id. Every team
/// survives; teams without recent starts get empty pitcher columns. All rows
/// share the `created_at` stamp.
#[must_use]
pub fn merge_features(
    teams: BTreeMap<i32, TeamFeature>,
    mut pitchers: BTreeMap<i32, PitcherFeature>,
    created_at: NaiveDateTime,
) -> Vec<RecentTeamPerformance> {
    teams
        .into_values()
        .map(|team| {
            let pitcher = pitchers.remove(&team.team_id).unwrap_or_default();
            RecentTeamPerformance::new(team, pitcher, created_at)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::performance::window::group_recent;
    use chrono::NaiveDate;

    fn team_row(team_id: i32, day: u32, ops: Option<f64>, name: &str) -> TeamGameStat {
        TeamGameStat {
            game_id: day as i32,
            team_id,
            game_date: NaiveDate::from_ymd_opt(2025, 7, day),
            team_name: Some(name.to_owned()),
            ops,
            ..TeamGameStat::default()
        }
    }

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_rolling_mean_rounds() {
        let window = vec![Some(10.0), Some(20.0), Some(50.0 / 3.0)];
        assert_eq!(rolling_mean(&window, |v| *v), Some(15.556));
    }

    #[test]
    fn test_round3_uses_decimal_value() {
        assert_eq!(round3(1.0005), 1.0);
        assert_eq!(round3(2.0 / 3.0), 0.667);
        assert_eq!(round3(-1.23456), -1.235);
        assert_eq!(rolling_mean(&[Some(1.0005)], |v| *v), Some(1.0));
    }

    #[test]
    fn test_rolling_mean_skips_missing() {
        let window = vec![None, Some(3.0), Some(f64::NAN), Some(f64::INFINITY), Some(5.0)];
        assert_eq!(rolling_mean(&window, |v| *v), Some(4.0));
    }

    #[test]
    fn test_rolling_mean_all_missing() {
        let window: Vec<Option<f64>> = vec![None, Some(f64::NAN)];
        assert_eq!(rolling_mean(&window, |v| *v), None);
        let empty: Vec<Option<f64>> = Vec::new();
        assert_eq!(rolling_mean(&empty, |v| *v), None);
    }

    #[test]
    fn test_team_feature_window_scenario() {
        let rows = vec![
            team_row(5, 3, Some(10.0), "third"),
            team_row(5, 1, Some(20.0), "first"),
            team_row(5, 4, Some(30.0), "fourth"),
            team_row(5, 2, Some(40.0), "second"),
        ];
        let grouped = group_recent(rows, 3);
        let feature = TeamFeature::from_window(5, &grouped[&5]);
        assert_eq!(feature.ops, Some(26.667));
        // name comes from the oldest kept game (day 2), not the newest
        assert_eq!(feature.team_name.as_deref(), Some("second"));
        assert_eq!(feature.batting_avg, None);
    }

    #[test]
    fn test_team_feature_fields_independent() {
        let mut a = team_row(1, 1, None, "A");
        a.slg = Some(0.400);
        let mut b = team_row(1, 2, Some(0.700), "A");
        b.slg = None;
        let feature = TeamFeature::from_window(1, &[b, a]);
        assert_eq!(feature.ops, Some(0.7));
        assert_eq!(feature.slg, Some(0.4));
    }

    #[test]
    fn test_team_feature_is_deterministic() {
        let window = vec![
            team_row(2, 3, Some(0.812), "B"),
            team_row(2, 2, Some(0.733), "B"),
        ];
        assert_eq!(
            TeamFeature::from_window(2, &window),
            TeamFeature::from_window(2, &window)
        );
    }

    #[test]
    fn test_pitcher_feature_prefixed() {
        let window = vec![
            PitcherGameStat {
                team_id: 9,
                era: Some(3.0),
                innings_pitched: Some(6.0),
                ..PitcherGameStat::default()
            },
            PitcherGameStat {
                team_id: 9,
                era: Some(4.5),
                innings_pitched: None,
                ..PitcherGameStat::default()
            },
        ];
        let feature = PitcherFeature::from_window(9, &window);
        assert_eq!(feature.pitcher_era, Some(3.75));
        assert_eq!(feature.pitcher_innings_pitched, Some(6.0));
        assert_eq!(feature.pitcher_whip, None);
    }

    #[test]
    fn test_merge_features_left_join() {
        let mut teams = BTreeMap::new();
        teams.insert(
            1,
            TeamFeature {
                team_id: 1,
                ops: Some(0.75),
                ..TeamFeature::default()
            },
        );
        teams.insert(
            2,
            TeamFeature {
                team_id: 2,
                ops: Some(0.65),
                ..TeamFeature::default()
            },
        );
        let mut pitchers = BTreeMap::new();
        pitchers.insert(
            2,
            PitcherFeature {
                team_id: 2,
                pitcher_era: Some(2.5),
                ..PitcherFeature::default()
            },
        );
        // a rotation with no team row never reaches the output
        pitchers.insert(
            3,
            PitcherFeature {
                team_id: 3,
                pitcher_era: Some(9.0),
                ..PitcherFeature::default()
            },
        );

        let merged = merge_features(teams, pitchers, stamp());
        assert_eq!(merged.len(), 2);
        let one = merged.iter().find(|r| r.team_id == 1).unwrap();
        let two = merged.iter().find(|r| r.team_id == 2).unwrap();
        assert_eq!(one.ops, Some(0.75));
        assert_eq!(one.pitcher_era, None);
        assert_eq!(two.pitcher_era, Some(2.5));
        assert_eq!(two.team_id, 2);
        assert!(merged.iter().all(|r| r.created_at == stamp()));
    }
}
