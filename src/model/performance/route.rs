/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use crate::db::DbConn;
use crate::model::{
    compute_recent_performance, Pipeline, Pipelines, RecentTeamPerformance, RunReport,
};
use crate::settings::Settings;
use crate::Error;
use rocket::serde::json::Json;
use rocket::State;

/// # Recompute Recent Performance
/// Rebuilds every team's rolling features from its recent games and its
/// rotation's recent starts, replacing the stored table. Answers 409 if a
/// run is already in progress.
#[openapi(tag = "Performance")]
#[get("/performance/run")]
pub(crate) async fn run_recent_performance(
    conn: DbConn,
    settings: &State<Settings>,
    pipelines: &State<Pipelines>,
) -> Result<Json<RunReport>, Error> {
    let _running = pipelines.claim(Pipeline::RecentPerformance)?;
    let settings = settings.inner().clone();
    let report = conn
        .run(move |c| compute_recent_performance(&settings, c))
        .await;
    Ok(Json(report))
}

/// # Recent Performance
/// Stored rolling features for every team, or for one team with `?team_id=`.
#[openapi(tag = "Performance")]
#[get("/performance?<team_id>")]
pub(crate) async fn recent_performance(
    team_id: Option<i32>,
    conn: DbConn,
) -> Result<Json<Vec<RecentTeamPerformance>>, Error> {
    match team_id {
        Some(team) => match conn
            .run(move |c| RecentTeamPerformance::load_team(team, c))
            .await
        {
            Ok(row) => Ok(Json(vec![row])),
            Err(diesel::result::Error::NotFound) => Error::not_found(),
            Err(e) => Err(e.into()),
        },
        None => Ok(Json(conn.run(RecentTeamPerformance::load).await?)),
    }
}
