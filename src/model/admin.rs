/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use crate::settings::Settings;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Request guard for routes that record official results. Passes only when
/// the `X-Admin-Key` header matches `diamond.admin_key`; an unset key locks
/// the routes entirely.
pub struct AdminKey;

fn key_matches(configured: &str, presented: Option<&str>) -> bool {
    !configured.is_empty() && presented == Some(configured)
}

#[rocket::async_trait]
impl<'a> FromRequest<'a> for AdminKey {
    type Error = ();

    async fn from_request(request: &'a Request<'_>) -> Outcome<Self, Self::Error> {
        let configured = request
            .rocket()
            .state::<Settings>()
            .map(|s| s.admin_key.as_str())
            .unwrap_or_default();
        if key_matches(configured, request.headers().get_one(ADMIN_KEY_HEADER)) {
            Outcome::Success(AdminKey)
        } else {
            Outcome::Error((Status::Unauthorized, ()))
        }
    }
}

impl<'a> OpenApiFromRequest<'a> for AdminKey {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches() {
        assert!(key_matches("sekrit", Some("sekrit")));
        assert!(!key_matches("sekrit", Some("guess")));
        assert!(!key_matches("sekrit", None));
        assert!(!key_matches("", Some("")));
        assert!(!key_matches("", None));
    }
}
