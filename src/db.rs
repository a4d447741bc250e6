/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::error::{MapRre, Result};
use ::diesel::{Connection, PgConnection};
use rocket::figment::Figment;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use rocket_sync_db_pools::database;

#[database("postgres_global")]
pub struct DbConn(PgConnection);

impl<'r> OpenApiFromRequest<'r> for DbConn {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}

/// Opens a standalone connection for the batch runner, using the same
/// `databases.postgres_global.url` key the pool fairing reads.
pub fn establish_connection(figment: &Figment) -> Result<PgConnection> {
    let database_url: String = figment
        .extract_inner("databases.postgres_global.url")
        .map_err(|_| crate::Error::BadRequest {
            reason: String::from("Database not set in configuration."),
        })?;
    PgConnection::establish(&database_url).map_rre()
}
