/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use okapi::openapi3::Responses;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::Request;
use rocket_okapi::{gen::OpenApiGenerator, response::OpenApiResponderInner, OpenApiError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Diesel {
        #[from]
        source: diesel::result::Error,
    },
    #[error("Connection Error {source:?}")]
    Connection {
        #[from]
        source: diesel::ConnectionError,
    },
    #[error("NotFound Error")]
    NotFound {},

    #[error("Bad Request: {reason}")]
    BadRequest { reason: String },

    #[error("Pipeline {pipeline} is already running")]
    Conflict { pipeline: &'static str },
}

pub type Result<T> = std::result::Result<T, crate::Error>;

pub trait MapRre<T> {
    fn map_rre(self) -> Result<T>;
}

impl<T, E> MapRre<T> for std::result::Result<T, E>
where
    Error: From<E>,
{
    fn map_rre(self) -> Result<T> {
        self.map_err(crate::Error::from)
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        match self {
            Error::NotFound {} => Status::NotFound.respond_to(req),
            Error::BadRequest { reason } => {
                log::warn!("Rejected request: {reason}");
                Status::BadRequest.respond_to(req)
            }
            Error::Conflict { .. } => Status::Conflict.respond_to(req),
            other => {
                log::error!("{other}");
                Status::InternalServerError.respond_to(req)
            }
        }
    }
}

impl Error {
    pub fn not_found<T>() -> std::result::Result<T, Error> {
        std::result::Result::Err(Error::NotFound {})
    }

    pub fn bad_request<T>(reason: impl Into<String>) -> std::result::Result<T, Error> {
        std::result::Result::Err(Error::BadRequest {
            reason: reason.into(),
        })
    }
}

impl OpenApiResponderInner for Error {
    fn responses(
        _generator: &mut OpenApiGenerator,
    ) -> std::result::Result<Responses, OpenApiError> {
        Ok(Default::default())
    }
}
