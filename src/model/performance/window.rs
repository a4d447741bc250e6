/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A dated row that belongs to one entity (a team, or a team's rotation).
pub trait Windowed {
    type Key: Ord + Copy + std::fmt::Debug;

    fn entity_key(&self) -> Self::Key;
    fn game_date(&self) -> Option<NaiveDate>;
}

/// Buckets `rows` by entity and keeps the `window` most recent rows of each,
/// ordered most recent first.
///
/// Rows are stable-sorted by (entity ascending, date descending) before
/// being dealt into buckets, so ties on date keep their input order. Rows
/// without a date can't be placed in recency order and are dropped with a
/// warning. An entity whose rows were all dropped doesn't appear in the
/// output at all.
pub fn group_recent<R: Windowed>(rows: Vec<R>, window: usize) -> BTreeMap<R::Key, Vec<R>> {
    let (mut dated, undated): (Vec<R>, Vec<R>) =
        rows.into_iter().partition(|row| row.game_date().is_some());
    for row in &undated {
        log::warn!(
            "Skipping row for {:?} with no game date; recency order is unknown",
            row.entity_key()
        );
    }

    // sort_by is stable
    dated.sort_by(|a, b| {
        a.entity_key()
            .cmp(&b.entity_key())
            .then_with(|| b.game_date().cmp(&a.game_date()))
    });

    let mut grouped: BTreeMap<R::Key, Vec<R>> = BTreeMap::new();
    if window == 0 {
        return grouped;
    }
    for row in dated {
        let bucket = grouped.entry(row.entity_key()).or_default();
        if bucket.len() < window {
            bucket.push(row);
        }
    }
    grouped
}
