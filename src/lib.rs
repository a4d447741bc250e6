/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
#![allow(clippy::too_many_arguments)]
#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate rocket_okapi;
#[cfg(test)]
mod test;

mod catchers;
pub mod db;
mod error;
pub mod model;
pub mod schema;
pub mod settings;
pub use crate::error::{Error, Result};

pub mod rocket_launcher {
    use crate::catchers;
    use crate::db::DbConn;
    use crate::model::{bracket, performance, sys, Pipelines};
    use crate::settings::Settings;
    use rocket::fairing::AdHoc;
    use rocket::{Build, Rocket};
    use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

    pub fn launcher() -> Rocket<Build> {
        // The paths on the /api endpoint. Defined up here for cleanliness
        let api_paths = openapi_get_routes![
            performance::route::run_recent_performance,
            performance::route::recent_performance,
            bracket::route::score,
            bracket::route::leaderboard,
            bracket::route::record_result,
            sys::route::sysinfo,
        ];

        let rocket = rocket::build();
        let settings = Settings::from_figment(rocket.figment());

        rocket
            .attach(DbConn::fairing())
            .attach(AdHoc::on_liftoff("Admin Key Check", |rocket| {
                Box::pin(async move {
                    let locked = rocket
                        .state::<Settings>()
                        .map_or(true, |s| s.admin_key.is_empty());
                    if locked {
                        log::warn!("diamond.admin_key is not set; result entry is disabled");
                    }
                })
            }))
            .register(
                "/",
                catchers![
                    catchers::bad_request,
                    catchers::not_authorized,
                    catchers::not_found,
                    catchers::conflict,
                    catchers::unprocessable_entity,
                    catchers::internal_error
                ],
            )
            .manage(settings)
            .manage(Pipelines::default())
            .mount("/api", api_paths)
            .mount(
                "/docs/",
                make_swagger_ui(&SwaggerUIConfig {
                    url: "../api/openapi.json".to_owned(),
                    ..Default::default()
                }),
            )
    }
}
