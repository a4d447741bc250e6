/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

pub mod admin;
pub mod bracket;
pub mod performance;
pub mod sys;
pub use admin::{AdminKey, ADMIN_KEY_HEADER};
pub use bracket::model::{
    plan_scores, score_brackets, Bracket, BracketScore, LeaderboardEntry, NewPlayoffResult,
    PlayoffSeriesResult, ScoreReport,
};
pub use performance::model::{
    build_recent_performance, compute_recent_performance, PitcherGameStat, RecentTeamPerformance,
    RunReport, TeamGameStat,
};
pub use sys::model::{Pipeline, Pipelines};
