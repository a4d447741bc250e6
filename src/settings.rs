/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use rocket::figment::Figment;
use schemars::JsonSchema;

/// Default number of recent games averaged per team.
pub const TEAM_WINDOW: usize = 14;
/// Default number of recent starts averaged per team's rotation.
pub const PITCHER_WINDOW: usize = 5;
/// Postseason scored when the caller doesn't name one.
pub const SEASON: i32 = 2025;

/// Settings read from the `diamond` table of `Rocket.toml`.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub team_window: usize,
    pub pitcher_window: usize,
    pub season: i32,
    #[serde(skip_serializing)]
    #[schemars(skip)]
    pub admin_key: String,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            team_window: TEAM_WINDOW,
            pitcher_window: PITCHER_WINDOW,
            season: SEASON,
            admin_key: String::new(),
        }
    }
}

impl Settings {
    /// Reads `diamond.*` from the figment, falling back to defaults when the
    /// table is absent or malformed.
    pub fn from_figment(figment: &Figment) -> Settings {
        match figment.extract_inner::<Settings>("diamond") {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default diamond settings: {e}");
                Settings::default()
            }
        }
    }
}
