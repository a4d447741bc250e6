/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use super::aggregate::{merge_features, PitcherFeature, TeamFeature};
use super::window::{group_recent, Windowed};
use crate::schema::{pitcher_stats, recent_team_performance, team_stats};
use crate::settings::Settings;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::upsert::excluded;
use schemars::JsonSchema;
use std::collections::BTreeMap;

/// One team's line from one completed game.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Default)]
#[diesel(table_name = team_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamGameStat {
    pub game_id: i32,
    pub team_id: i32,
    pub game_date: Option<NaiveDate>,
    pub team_name: Option<String>,
    pub batting_avg: Option<f64>,
    pub obp: Option<f64>,
    pub slg: Option<f64>,
    #[diesel(column_name = on_base_plus_slugging)]
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

/// A starting pitcher's line from one game they started.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Default)]
#[diesel(table_name = pitcher_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PitcherGameStat {
    pub game_id: i32,
    pub team_id: i32,
    pub pitcher_id: Option<i32>,
    pub game_date: Option<NaiveDate>,
    pub era: Option<f64>,
    pub whip: Option<f64>,
    pub so9: Option<f64>,
    pub bb9: Option<f64>,
    pub hr9: Option<f64>,
    pub innings_pitched: Option<f64>,
}

impl Windowed for TeamGameStat {
    type Key = i32;

    fn entity_key(&self) -> i32 {
        self.team_id
    }

    fn game_date(&self) -> Option<NaiveDate> {
        self.game_date
    }
}

// Starts are windowed per team, not per pitcher: the feature describes the
// rotation as a whole.
impl Windowed for PitcherGameStat {
    type Key = i32;

    fn entity_key(&self) -> i32 {
        self.team_id
    }

    fn game_date(&self) -> Option<NaiveDate> {
        self.game_date
    }
}

impl TeamGameStat {
    pub fn load(conn: &mut PgConnection) -> Result<Vec<TeamGameStat>, Error> {
        team_stats::table
            .select(TeamGameStat::as_select())
            .load(conn)
    }
}

impl PitcherGameStat {
    pub fn load_starters(conn: &mut PgConnection) -> Result<Vec<PitcherGameStat>, Error> {
        pitcher_stats::table
            .filter(pitcher_stats::is_starter.eq(true))
            .select(PitcherGameStat::as_select())
            .load(conn)
    }
}

/// Rolling form for one team: batting, fielding and bullpen averages over its
/// recent games, joined with its rotation's recent starts.
#[derive(
    Queryable, Selectable, Insertable, Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq,
)]
#[diesel(table_name = recent_team_performance)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct RecentTeamPerformance {
    pub team_id: i32,
    /// Name as listed on the oldest game in the team's window
    pub team_name: Option<String>,
    pub batting_avg: Option<f64>,
    pub obp: Option<f64>,
    pub slg: Option<f64>,
    #[diesel(column_name = on_base_plus_slugging)]
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
    pub pitcher_era: Option<f64>,
    pub pitcher_whip: Option<f64>,
    pub pitcher_so9: Option<f64>,
    pub pitcher_bb9: Option<f64>,
    pub pitcher_hr9: Option<f64>,
    pub pitcher_innings_pitched: Option<f64>,
    /// When this row was last recomputed
    pub created_at: NaiveDateTime,
}

/// Outcome of one recent-performance run, as reported to whoever triggered it.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub success: bool,
    /// Teams written (0 when there was nothing to aggregate)
    pub teams: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecentTeamPerformance {
    #[must_use]
    pub fn new(
        team: TeamFeature,
        pitcher: PitcherFeature,
        created_at: NaiveDateTime,
    ) -> RecentTeamPerformance {
        RecentTeamPerformance {
            team_id: team.team_id,
            team_name: team.team_name,
            batting_avg: team.batting_avg,
            obp: team.obp,
            slg: team.slg,
            ops: team.ops,
            runs_per_game: team.runs_per_game,
            strikeouts_per_game: team.strikeouts_per_game,
            walks_per_game: team.walks_per_game,
            rbi_per_game: team.rbi_per_game,
            hits_per_game: team.hits_per_game,
            left_on_base: team.left_on_base,
            errors_per_game: team.errors_per_game,
            def_efficiency: team.def_efficiency,
            home_runs_per_game: team.home_runs_per_game,
            bullpen_era: team.bullpen_era,
            bullpen_whip: team.bullpen_whip,
            bullpen_so9: team.bullpen_so9,
            bullpen_innings_pitched: team.bullpen_innings_pitched,
            pitcher_era: pitcher.pitcher_era,
            pitcher_whip: pitcher.pitcher_whip,
            pitcher_so9: pitcher.pitcher_so9,
            pitcher_bb9: pitcher.pitcher_bb9,
            pitcher_hr9: pitcher.pitcher_hr9,
            pitcher_innings_pitched: pitcher.pitcher_innings_pitched,
            created_at,
        }
    }

    pub fn load(conn: &mut PgConnection) -> Result<Vec<RecentTeamPerformance>, Error> {
        recent_team_performance::table
            .select(RecentTeamPerformance::as_select())
            .order_by(recent_team_performance::team_id)
            .load(conn)
    }

    pub fn load_team(team: i32, conn: &mut PgConnection) -> Result<RecentTeamPerformance, Error> {
        recent_team_performance::table
            .filter(recent_team_performance::team_id.eq(team))
            .select(RecentTeamPerformance::as_select())
            .first(conn)
    }

    /// Replaces every column of each team's row, inserting teams seen for the
    /// first time. All rows go in one statement, so either the whole batch
    /// lands or none of it does.
    pub fn upsert(rows: &[RecentTeamPerformance], conn: &mut PgConnection) -> QueryResult<usize> {
        use crate::schema::recent_team_performance::dsl::*;
        diesel::insert_into(recent_team_performance)
            .values(rows)
            .on_conflict(team_id)
            .do_update()
            .set((
                team_name.eq(excluded(team_name)),
                batting_avg.eq(excluded(batting_avg)),
                obp.eq(excluded(obp)),
                slg.eq(excluded(slg)),
                on_base_plus_slugging.eq(excluded(on_base_plus_slugging)),
                runs_per_game.eq(excluded(runs_per_game)),
                strikeouts_per_game.eq(excluded(strikeouts_per_game)),
                walks_per_game.eq(excluded(walks_per_game)),
                rbi_per_game.eq(excluded(rbi_per_game)),
                hits_per_game.eq(excluded(hits_per_game)),
                left_on_base.eq(excluded(left_on_base)),
                errors_per_game.eq(excluded(errors_per_game)),
                def_efficiency.eq(excluded(def_efficiency)),
                home_runs_per_game.eq(excluded(home_runs_per_game)),
                bullpen_era.eq(excluded(bullpen_era)),
                bullpen_whip.eq(excluded(bullpen_whip)),
                bullpen_so9.eq(excluded(bullpen_so9)),
                bullpen_innings_pitched.eq(excluded(bullpen_innings_pitched)),
                pitcher_era.eq(excluded(pitcher_era)),
                pitcher_whip.eq(excluded(pitcher_whip)),
                pitcher_so9.eq(excluded(pitcher_so9)),
                pitcher_bb9.eq(excluded(pitcher_bb9)),
                pitcher_hr9.eq(excluded(pitcher_hr9)),
                pitcher_innings_pitched.eq(excluded(pitcher_innings_pitched)),
                created_at.eq(excluded(created_at)),
            ))
            .execute(conn)
    }
}

/// Builds the per-team rows from raw game history. Pure: no I/O, and the
/// stamp is supplied by the caller.
#[must_use]
pub fn build_recent_performance(
    team_rows: Vec<TeamGameStat>,
    pitcher_rows: Vec<PitcherGameStat>,
    settings: &Settings,
    created_at: NaiveDateTime,
) -> Vec<RecentTeamPerformance> {
    let teams: BTreeMap<i32, TeamFeature> = group_recent(team_rows, settings.team_window)
        .into_iter()
        .map(|(team, window)| (team, TeamFeature::from_window(team, &window)))
        .collect();
    let pitchers: BTreeMap<i32, PitcherFeature> =
        group_recent(pitcher_rows, settings.pitcher_window)
            .into_iter()
            .map(|(team, window)| (team, PitcherFeature::from_window(team, &window)))
            .collect();
    merge_features(teams, pitchers, created_at)
}

fn run_recent_performance(settings: &Settings, conn: &mut PgConnection) -> Result<usize, Error> {
    let team_rows = TeamGameStat::load(conn)?;
    let pitcher_rows = if team_rows.is_empty() {
        Vec::new()
    } else {
        PitcherGameStat::load_starters(conn)?
    };
    log::info!(
        "Aggregating {} team rows and {} starter rows",
        team_rows.len(),
        pitcher_rows.len()
    );

    let rows = build_recent_performance(
        team_rows,
        pitcher_rows,
        settings,
        Utc::now().naive_utc(),
    );
    if rows.is_empty() {
        log::info!("No dated team stats found; nothing to write");
        return Ok(0);
    }
    let written = conn.transaction(|c| RecentTeamPerformance::upsert(&rows, c))?;
    log::info!("Recent performance written for {written} teams");
    Ok(written)
}

impl RunReport {
    #[must_use]
    pub fn from_outcome(outcome: Result<usize, Error>) -> RunReport {
        match outcome {
            Ok(teams) => RunReport {
                success: true,
                teams,
                error: None,
            },
            Err(e) => {
                log::error!("Recent performance run failed: {e:?}");
                RunReport {
                    success: false,
                    teams: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Recomputes the whole recent-performance table.
///
/// Callers must not run this concurrently with itself: a slow run finishing
/// last would overwrite a newer one.
pub fn compute_recent_performance(settings: &Settings, conn: &mut PgConnection) -> RunReport {
    RunReport::from_outcome(run_recent_performance(settings, conn))
}
