/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use crate::db::DbConn;
use crate::model::bracket::scoring::series_year;
use crate::model::{
    score_brackets, AdminKey, LeaderboardEntry, NewPlayoffResult, Pipeline, Pipelines,
    PlayoffSeriesResult, ScoreReport,
};
use crate::settings::Settings;
use crate::Error;
use chrono::Utc;
use diesel::Connection;
use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;

/// # Score Brackets
/// Rescores every bracket for `year` (default: the configured season) against
/// all finished series. Answers 409 if scoring is already in progress.
#[openapi(tag = "Brackets")]
#[get("/brackets/score?<year>")]
pub(crate) async fn score(
    year: Option<i32>,
    conn: DbConn,
    settings: &State<Settings>,
    pipelines: &State<Pipelines>,
) -> Result<Json<ScoreReport>, Error> {
    let _running = pipelines.claim(Pipeline::BracketScoring)?;
    let season = year.unwrap_or(settings.season);
    Ok(Json(conn.run(move |c| score_brackets(season, c)).await?))
}

/// # Bracket Leaderboard
/// Brackets for `year` (default: the configured season), best first.
#[openapi(tag = "Brackets")]
#[get("/brackets/leaderboard?<year>")]
pub(crate) async fn leaderboard(
    year: Option<i32>,
    conn: DbConn,
    settings: &State<Settings>,
) -> Result<Json<Vec<LeaderboardEntry>>, Error> {
    let season = year.unwrap_or(settings.season);
    Ok(Json(
        conn.run(move |c| LeaderboardEntry::load(season, c)).await?,
    ))
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
pub struct RecordedResult {
    pub result: PlayoffSeriesResult,
    pub score: ScoreReport,
}

/// # Record Series Result
/// Records (or corrects) the outcome of one playoff series, then rescores the
/// brackets for that series' season. Both happen in one transaction: if
/// scoring fails, the result isn't stored either. Requires the `X-Admin-Key`
/// header.
#[openapi(tag = "Brackets")]
#[post("/playoffs/result", format = "json", data = "<submission>")]
pub(crate) async fn record_result(
    submission: Json<NewPlayoffResult>,
    _admin: AdminKey,
    conn: DbConn,
    settings: &State<Settings>,
    pipelines: &State<Pipelines>,
) -> Result<Json<RecordedResult>, Error> {
    let result = submission.into_inner().validate(Utc::now().naive_utc())?;
    let season = series_year(&result.series_id).unwrap_or(settings.season);
    let _running = pipelines.claim(Pipeline::BracketScoring)?;
    let recorded = conn
        .run(move |c| {
            c.transaction::<_, Error, _>(|c| {
                PlayoffSeriesResult::upsert(&result, c)?;
                log::info!(
                    "Recorded {} ({} over {})",
                    result.series_id,
                    result.winning_team_id,
                    result.losing_team_id
                );
                let score = score_brackets(season, c)?;
                Ok(RecordedResult { result, score })
            })
        })
        .await?;
    Ok(Json(recorded))
}
