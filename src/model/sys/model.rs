/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use rocket::tokio::sync::{Mutex, MutexGuard};

/// The batch pipelines a host can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    RecentPerformance,
    BracketScoring,
}

impl Pipeline {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Pipeline::RecentPerformance => "recent_performance",
            Pipeline::BracketScoring => "bracket_scoring",
        }
    }
}

/// One lock per pipeline, held for the length of a run. At most one run of
/// each pipeline is in flight per server.
#[derive(Default)]
pub struct Pipelines {
    recent_performance: Mutex<()>,
    bracket_scoring: Mutex<()>,
}

impl Pipelines {
    /// Claims `pipeline` if nobody else is running it.
    pub fn claim(&self, pipeline: Pipeline) -> crate::Result<MutexGuard<'_, ()>> {
        let lock = match pipeline {
            Pipeline::RecentPerformance => &self.recent_performance,
            Pipeline::BracketScoring => &self.bracket_scoring,
        };
        lock.try_lock().map_err(|_| {
            log::warn!("{} already running; request turned away", pipeline.name());
            crate::Error::Conflict {
                pipeline: pipeline.name(),
            }
        })
    }
}
