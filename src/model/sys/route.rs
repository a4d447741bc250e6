/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use crate::catchers::Status;
use crate::settings::Settings;
use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;

/// # System Information
/// Gives the running version and the window sizes features are computed with.
#[openapi(tag = "System")]
#[get("/sys/info")]
pub(crate) async fn sysinfo(settings: &State<Settings>) -> Result<Json<PubSysInfo>, Status> {
    std::result::Result::Ok(Json(PubSysInfo::new(settings.inner().clone())))
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct PubSysInfo {
    pub(crate) version: String,
    pub(crate) settings: Settings,
}

impl PubSysInfo {
    pub(crate) fn new(settings: Settings) -> PubSysInfo {
        PubSysInfo {
            version: git_version::git_version!(
                fallback = option_env!("GIT_HASH").unwrap_or(env!("CARGO_PKG_VERSION"))
            )
            .to_string(),
            settings,
        }
    }
}
