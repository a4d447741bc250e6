/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use super::model::{Bracket, BracketScore, PlayoffSeriesResult};
use chrono::NaiveDateTime;
use schemars::JsonSchema;
use std::fmt;
use std::str::FromStr;

/// Postseason rounds, in the order they're played.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    WildCard,
    Division,
    Championship,
    WorldSeries,
}

impl Round {
    pub const ALL: [Round; 4] = [
        Round::WildCard,
        Round::Division,
        Round::Championship,
        Round::WorldSeries,
    ];

    /// Points for each correctly picked series in this round.
    #[must_use]
    pub fn points(self) -> i32 {
        match self {
            Round::WildCard => 10,
            Round::Division => 20,
            Round::Championship => 30,
            Round::WorldSeries => 40,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Round::WildCard => "wild_card",
            Round::Division => "division",
            Round::Championship => "championship",
            Round::WorldSeries => "world_series",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Round {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Round::ALL
            .into_iter()
            .find(|round| round.as_str() == s)
            .ok_or_else(|| crate::Error::BadRequest {
                reason: format!(
                    "Invalid round {s:?}. Must be one of: wild_card, division, championship, world_series"
                ),
            })
    }
}

/// The eleven picks on a bracket, one per series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketSlot {
    AlWildCard1,
    AlWildCard2,
    NlWildCard1,
    NlWildCard2,
    AlDivision1,
    AlDivision2,
    NlDivision1,
    NlDivision2,
    AlChampionship,
    NlChampionship,
    WorldSeries,
}

impl BracketSlot {
    pub const ALL: [BracketSlot; 11] = [
        BracketSlot::AlWildCard1,
        BracketSlot::AlWildCard2,
        BracketSlot::NlWildCard1,
        BracketSlot::NlWildCard2,
        BracketSlot::AlDivision1,
        BracketSlot::AlDivision2,
        BracketSlot::NlDivision1,
        BracketSlot::NlDivision2,
        BracketSlot::AlChampionship,
        BracketSlot::NlChampionship,
        BracketSlot::WorldSeries,
    ];

    /// Series code following the year in a series id, e.g. `ALWC1` in
    /// `2025-ALWC1`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            BracketSlot::AlWildCard1 => "ALWC1",
            BracketSlot::AlWildCard2 => "ALWC2",
            BracketSlot::NlWildCard1 => "NLWC1",
            BracketSlot::NlWildCard2 => "NLWC2",
            BracketSlot::AlDivision1 => "ALDS1",
            BracketSlot::AlDivision2 => "ALDS2",
            BracketSlot::NlDivision1 => "NLDS1",
            BracketSlot::NlDivision2 => "NLDS2",
            BracketSlot::AlChampionship => "ALCS",
            BracketSlot::NlChampionship => "NLCS",
            BracketSlot::WorldSeries => "WS",
        }
    }

    #[must_use]
    pub fn round(self) -> Round {
        match self {
            BracketSlot::AlWildCard1
            | BracketSlot::AlWildCard2
            | BracketSlot::NlWildCard1
            | BracketSlot::NlWildCard2 => Round::WildCard,
            BracketSlot::AlDivision1
            | BracketSlot::AlDivision2
            | BracketSlot::NlDivision1
            | BracketSlot::NlDivision2 => Round::Division,
            BracketSlot::AlChampionship | BracketSlot::NlChampionship => Round::Championship,
            BracketSlot::WorldSeries => Round::WorldSeries,
        }
    }

    #[must_use]
    pub fn series_id(self, year: i32) -> String {
        format!("{year}-{}", self.code())
    }

    /// The slot a series id fills in `year`'s bracket, if any.
    #[must_use]
    pub fn from_series_id(year: i32, series_id: &str) -> Option<BracketSlot> {
        let (prefix, code) = series_id.split_once('-')?;
        if prefix.parse::<i32>().ok()? != year {
            return None;
        }
        BracketSlot::ALL.into_iter().find(|slot| slot.code() == code)
    }
}

/// Season encoded in a series id's prefix.
#[must_use]
pub fn series_year(series_id: &str) -> Option<i32> {
    series_id.split_once('-')?.0.parse().ok()
}

/// A decided series placed on the bracket: which slot it fills and who won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOutcome {
    pub slot: BracketSlot,
    pub winning_team_id: i32,
}

/// Places each decided series on `year`'s bracket.
///
/// Results without an end date aren't final and are ignored. A result whose
/// round is unknown, whose series id has no slot this year, or whose round
/// disagrees with its slot's round is worth nothing; it's logged and skipped.
#[must_use]
pub fn place_results(year: i32, results: &[PlayoffSeriesResult]) -> Vec<SlotOutcome> {
    let mut outcomes = Vec::new();
    for result in results.iter().filter(|r| r.series_end_date.is_some()) {
        let round = match result.round.parse::<Round>() {
            Ok(round) => round,
            Err(e) => {
                log::warn!("Series {} not scored: {e}", result.series_id);
                continue;
            }
        };
        match BracketSlot::from_series_id(year, &result.series_id) {
            Some(slot) if slot.round() == round => outcomes.push(SlotOutcome {
                slot,
                winning_team_id: result.winning_team_id,
            }),
            Some(slot) => log::warn!(
                "Series {} recorded as {round} but its slot is {}; not scored",
                result.series_id,
                slot.round()
            ),
            None => log::warn!(
                "Series {} has no slot on the {year} bracket; not scored",
                result.series_id
            ),
        }
    }
    outcomes
}

/// Total points for one bracket: each correctly picked series earns its
/// round's value.
#[must_use]
pub fn bracket_points(bracket: &Bracket, outcomes: &[SlotOutcome]) -> i32 {
    outcomes
        .iter()
        .filter(|outcome| bracket.pick(outcome.slot) == Some(outcome.winning_team_id))
        .map(|outcome| outcome.slot.round().points())
        .sum()
}

/// Scores every bracket from scratch against the same set of outcomes.
#[must_use]
pub fn score_all(
    brackets: &[Bracket],
    outcomes: &[SlotOutcome],
    scored_at: NaiveDateTime,
) -> Vec<BracketScore> {
    brackets
        .iter()
        .map(|bracket| BracketScore {
            user_id: bracket.user_id.clone(),
            year: bracket.year,
            bracket_name: bracket.bracket_name.clone(),
            points_earned: bracket_points(bracket, outcomes),
            last_scored_at: scored_at,
        })
        .collect()
}
