/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use super::scoring::{place_results, score_all, BracketSlot, Round};
use crate::schema::{playoff_brackets, playoff_results};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use schemars::JsonSchema;

/// The recorded outcome of one playoff series.
#[derive(
    Queryable, Selectable, Insertable, Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq,
)]
#[diesel(table_name = playoff_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlayoffSeriesResult {
    /// Year and series code, e.g. `2025-ALDS1`
    pub series_id: String,
    /// One of `wild_card`, `division`, `championship`, `world_series`
    pub round: String,
    pub winning_team_id: i32,
    pub losing_team_id: i32,
    /// Unset until the series is over; only finished series are scored
    pub series_end_date: Option<NaiveDateTime>,
    pub games_won: Option<i32>,
    pub games_lost: Option<i32>,
    pub updated_at: Option<NaiveDateTime>,
}

/// A series result as submitted by an administrator.
#[derive(Deserialize, JsonSchema, Debug, Clone, Default)]
pub struct NewPlayoffResult {
    pub series_id: Option<String>,
    pub round: Option<String>,
    pub winning_team_id: Option<i32>,
    pub losing_team_id: Option<i32>,
    /// Defaults to the time of submission
    pub series_end_date: Option<NaiveDateTime>,
    pub games_won: Option<i32>,
    pub games_lost: Option<i32>,
}

impl NewPlayoffResult {
    /// Checks the submission and turns it into a storable result stamped at
    /// `now`.
    pub fn validate(self, now: NaiveDateTime) -> crate::Result<PlayoffSeriesResult> {
        let (Some(series_id), Some(round), Some(winning_team_id), Some(losing_team_id)) = (
            self.series_id.filter(|id| !id.trim().is_empty()),
            self.round,
            self.winning_team_id,
            self.losing_team_id,
        ) else {
            return crate::Error::bad_request(
                "Missing required fields: series_id, round, winning_team_id, losing_team_id",
            );
        };
        let round = round.parse::<Round>()?;
        if winning_team_id == losing_team_id {
            return crate::Error::bad_request("A team can't beat itself");
        }
        Ok(PlayoffSeriesResult {
            series_id: series_id.trim().to_owned(),
            round: round.to_string(),
            winning_team_id,
            losing_team_id,
            series_end_date: Some(self.series_end_date.unwrap_or(now)),
            games_won: self.games_won,
            games_lost: self.games_lost,
            updated_at: Some(now),
        })
    }
}

impl PlayoffSeriesResult {
    /// Every series that has finished, oldest first.
    pub fn load_completed(conn: &mut PgConnection) -> QueryResult<Vec<PlayoffSeriesResult>> {
        playoff_results::table
            .filter(playoff_results::series_end_date.is_not_null())
            .order_by(playoff_results::series_end_date.asc())
            .select(PlayoffSeriesResult::as_select())
            .load(conn)
    }

    pub fn upsert(result: &PlayoffSeriesResult, conn: &mut PgConnection) -> QueryResult<usize> {
        use crate::schema::playoff_results::dsl::*;
        diesel::insert_into(playoff_results)
            .values(result)
            .on_conflict(series_id)
            .do_update()
            .set((
                round.eq(excluded(round)),
                winning_team_id.eq(excluded(winning_team_id)),
                losing_team_id.eq(excluded(losing_team_id)),
                series_end_date.eq(excluded(series_end_date)),
                games_won.eq(excluded(games_won)),
                games_lost.eq(excluded(games_lost)),
                updated_at.eq(excluded(updated_at)),
            ))
            .execute(conn)
    }
}

/// One user's picks for a postseason.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Default)]
#[diesel(table_name = playoff_brackets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Bracket {
    pub user_id: String,
    pub year: i32,
    pub bracket_name: String,
    pub al_wildcard_1_winner: Option<i32>,
    pub al_wildcard_2_winner: Option<i32>,
    pub nl_wildcard_1_winner: Option<i32>,
    pub nl_wildcard_2_winner: Option<i32>,
    pub al_division_1_winner: Option<i32>,
    pub al_division_2_winner: Option<i32>,
    pub nl_division_1_winner: Option<i32>,
    pub nl_division_2_winner: Option<i32>,
    pub al_championship_winner: Option<i32>,
    pub nl_championship_winner: Option<i32>,
    pub world_series_champion: Option<i32>,
    pub points_earned: Option<i32>,
    pub last_scored_at: Option<NaiveDateTime>,
}

impl Bracket {
    /// The team picked to win the series in `slot`, if one was picked.
    #[must_use]
    pub fn pick(&self, slot: BracketSlot) -> Option<i32> {
        match slot {
            BracketSlot::AlWildCard1 => self.al_wildcard_1_winner,
            BracketSlot::AlWildCard2 => self.al_wildcard_2_winner,
            BracketSlot::NlWildCard1 => self.nl_wildcard_1_winner,
            BracketSlot::NlWildCard2 => self.nl_wildcard_2_winner,
            BracketSlot::AlDivision1 => self.al_division_1_winner,
            BracketSlot::AlDivision2 => self.al_division_2_winner,
            BracketSlot::NlDivision1 => self.nl_division_1_winner,
            BracketSlot::NlDivision2 => self.nl_division_2_winner,
            BracketSlot::AlChampionship => self.al_championship_winner,
            BracketSlot::NlChampionship => self.nl_championship_winner,
            BracketSlot::WorldSeries => self.world_series_champion,
        }
    }

    pub fn load_year(season: i32, conn: &mut PgConnection) -> QueryResult<Vec<Bracket>> {
        playoff_brackets::table
            .filter(playoff_brackets::year.eq(season))
            .select(Bracket::as_select())
            .load(conn)
    }
}

/// A freshly computed total for one bracket.
#[derive(Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = playoff_brackets)]
pub struct BracketScore {
    pub user_id: String,
    pub year: i32,
    pub bracket_name: String,
    pub points_earned: i32,
    pub last_scored_at: NaiveDateTime,
}

impl BracketScore {
    /// Overwrites the total on every bracket in one statement.
    pub fn upsert(scores: &[BracketScore], conn: &mut PgConnection) -> QueryResult<usize> {
        use crate::schema::playoff_brackets::dsl::*;
        diesel::insert_into(playoff_brackets)
            .values(scores)
            .on_conflict((user_id, year, bracket_name))
            .do_update()
            .set((
                points_earned.eq(excluded(points_earned)),
                last_scored_at.eq(excluded(last_scored_at)),
            ))
            .execute(conn)
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub brackets_scored: usize,
    pub results_processed: usize,
}

/// Works out the new total for every bracket in `brackets`, or `None` when
/// there is nothing to score: no finished series, or no brackets.
#[must_use]
pub fn plan_scores(
    season: i32,
    results: &[PlayoffSeriesResult],
    brackets: &[Bracket],
    scored_at: NaiveDateTime,
) -> Option<Vec<BracketScore>> {
    if results.is_empty() || brackets.is_empty() {
        return None;
    }
    let outcomes = place_results(season, results);
    Some(score_all(brackets, &outcomes, scored_at))
}

/// Rescores every bracket for `season` against all finished series.
///
/// Totals are recomputed from nothing on each call, so running it twice with
/// the same data writes the same numbers. Nothing is written when there are
/// no finished series or no brackets.
pub fn score_brackets(season: i32, conn: &mut PgConnection) -> crate::Result<ScoreReport> {
    let results = PlayoffSeriesResult::load_completed(conn)?;
    let brackets = if results.is_empty() {
        Vec::new()
    } else {
        Bracket::load_year(season, conn)?
    };
    let Some(scores) = plan_scores(season, &results, &brackets, Utc::now().naive_utc()) else {
        log::info!(
            "Nothing to score for {season}: {} results, {} brackets",
            results.len(),
            brackets.len()
        );
        return Ok(ScoreReport::default());
    };

    conn.transaction(|c| BracketScore::upsert(&scores, c))?;
    log::info!(
        "Scored {} brackets for {season} against {} results",
        scores.len(),
        results.len()
    );
    Ok(ScoreReport {
        brackets_scored: scores.len(),
        results_processed: results.len(),
    })
}

/// A row of the bracket standings.
#[derive(Queryable, Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub bracket_name: String,
    pub points_earned: Option<i32>,
    pub last_scored_at: Option<NaiveDateTime>,
}

impl LeaderboardEntry {
    pub fn load(season: i32, conn: &mut PgConnection) -> QueryResult<Vec<LeaderboardEntry>> {
        playoff_brackets::table
            .filter(playoff_brackets::year.eq(season))
            .select((
                playoff_brackets::user_id,
                playoff_brackets::bracket_name,
                playoff_brackets::points_earned,
                playoff_brackets::last_scored_at,
            ))
            .order((
                playoff_brackets::points_earned.desc().nulls_last(),
                playoff_brackets::last_scored_at.asc(),
                playoff_brackets::bracket_name.asc(),
            ))
            .load(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 12)
            .and_then(|d| d.and_hms_opt(1, 2, 3))
            .unwrap()
    }

    fn submission() -> NewPlayoffResult {
        NewPlayoffResult {
            series_id: Some(String::from("2025-NLDS2")),
            round: Some(String::from("division")),
            winning_team_id: Some(119),
            losing_team_id: Some(143),
            ..NewPlayoffResult::default()
        }
    }

    #[test]
    fn test_validate_defaults_end_date() {
        let result = submission().validate(now()).unwrap();
        assert_eq!(result.series_id, "2025-NLDS2");
        assert_eq!(result.round, "division");
        assert_eq!(result.series_end_date, Some(now()));
        assert_eq!(result.updated_at, Some(now()));
        assert_eq!(result.games_won, None);
    }

    #[test]
    fn test_validate_missing_fields() {
        let mut missing = submission();
        missing.losing_team_id = None;
        assert!(matches!(
            missing.validate(now()),
            Err(crate::Error::BadRequest { .. })
        ));
        let mut blank = submission();
        blank.series_id = Some(String::from("  "));
        assert!(blank.validate(now()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_round_and_self_win() {
        let mut bad_round = submission();
        bad_round.round = Some(String::from("quarterfinal"));
        assert!(bad_round.validate(now()).is_err());

        let mut same = submission();
        same.losing_team_id = Some(119);
        assert!(same.validate(now()).is_err());
    }

    #[test]
    fn test_bracket_pick_covers_every_slot() {
        let bracket = Bracket {
            al_wildcard_1_winner: Some(0),
            al_wildcard_2_winner: Some(1),
            nl_wildcard_1_winner: Some(2),
            nl_wildcard_2_winner: Some(3),
            al_division_1_winner: Some(4),
            al_division_2_winner: Some(5),
            nl_division_1_winner: Some(6),
            nl_division_2_winner: Some(7),
            al_championship_winner: Some(8),
            nl_championship_winner: Some(9),
            world_series_champion: Some(10),
            ..Bracket::default()
        };
        for (i, slot) in BracketSlot::ALL.into_iter().enumerate() {
            assert_eq!(bracket.pick(slot), Some(i as i32));
        }
    }

    fn finished(series_id: &str, round: &str, winner: i32) -> PlayoffSeriesResult {
        PlayoffSeriesResult {
            series_id: series_id.to_owned(),
            round: round.to_owned(),
            winning_team_id: winner,
            losing_team_id: winner + 1,
            series_end_date: Some(now()),
            games_won: Some(4),
            games_lost: Some(2),
            updated_at: Some(now()),
        }
    }

    fn picks_world_series(name: &str, champion: i32) -> Bracket {
        Bracket {
            user_id: String::from("a1"),
            year: 2025,
            bracket_name: name.to_owned(),
            world_series_champion: Some(champion),
            ..Bracket::default()
        }
    }

    #[test]
    fn test_plan_scores_without_results() {
        let brackets = vec![picks_world_series("main", 119)];
        assert_eq!(plan_scores(2025, &[], &brackets, now()), None);
        assert_eq!(
            ScoreReport::default(),
            ScoreReport {
                brackets_scored: 0,
                results_processed: 0
            }
        );
    }

    #[test]
    fn test_plan_scores_without_brackets() {
        let results = vec![finished("2025-WS", "world_series", 119)];
        assert_eq!(plan_scores(2025, &results, &[], now()), None);
    }

    #[test]
    fn test_plan_scores_every_bracket() {
        let results = vec![
            finished("2025-WS", "world_series", 119),
            finished("2025-ALWC1", "wild_card", 147),
        ];
        let brackets = vec![picks_world_series("main", 119), picks_world_series("alt", 147)];
        let scores = plan_scores(2025, &results, &brackets, now()).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].bracket_name, "main");
        assert_eq!(scores[0].points_earned, 40);
        // a zero total is still written so stale points get cleared
        assert_eq!(scores[1].points_earned, 0);
        assert!(scores.iter().all(|s| s.last_scored_at == now()));
    }

    #[test]
    fn test_score_report_camel_case() {
        let report = ScoreReport {
            brackets_scored: 3,
            results_processed: 5,
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"bracketsScored":3,"resultsProcessed":5}"#
        );
    }
}
