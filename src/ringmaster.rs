/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Batch runner for the scheduler. One pipeline per invocation:
//!
//! ```text
//! dmringmaster performance
//! dmringmaster brackets [YEAR]
//! ```
//!
//! The scheduler is responsible for never starting a second run of the same
//! pipeline while one is still going.

use rust_diamond::db::establish_connection;
use rust_diamond::model::{compute_recent_performance, score_brackets};
use rust_diamond::settings::Settings;

#[derive(Debug, PartialEq, Eq)]
enum Job {
    RecentPerformance,
    ScoreBrackets(Option<i32>),
}

fn parse_job(args: &[String]) -> Option<Job> {
    match args {
        [job] if job == "performance" => Some(Job::RecentPerformance),
        [job] if job == "brackets" => Some(Job::ScoreBrackets(None)),
        [job, year] if job == "brackets" => year.parse().ok().map(|y| Job::ScoreBrackets(Some(y))),
        _ => None,
    }
}

/// Runs the job; `Ok(false)` means it ran but reported failure.
fn runtime(job: Job) -> rust_diamond::Result<bool> {
    // Rocket figment gives us the information we need, then we discard it
    let figment = rocket::Config::figment();
    let settings = Settings::from_figment(&figment);
    let mut conn = establish_connection(&figment)?;

    match job {
        Job::RecentPerformance => {
            let report = compute_recent_performance(&settings, &mut conn);
            log::info!("Recent performance: {report:?}");
            Ok(report.success)
        }
        Job::ScoreBrackets(year) => {
            let season = year.unwrap_or(settings.season);
            let report = score_brackets(season, &mut conn)?;
            log::info!(
                "Brackets scored: {}, results processed: {}",
                report.brackets_scored,
                report.results_processed
            );
            Ok(true)
        }
    }
}

fn main() {
    use std::time::Instant;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(job) = parse_job(&args) else {
        eprintln!("usage: dmringmaster performance | dmringmaster brackets [YEAR]");
        std::process::exit(2);
    };

    let now = Instant::now();
    let state = runtime(job);
    log::info!("Elapsed: {:.2?}", now.elapsed());
    std::process::exit(match state {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            log::error!("error: {err:?}");
            1
        }
    });
}
