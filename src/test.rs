/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */
use crate::catchers::{self, Httperror};
use crate::model::sys::route::PubSysInfo;
use crate::model::{sys, AdminKey, NewPlayoffResult, Pipeline, Pipelines, ADMIN_KEY_HEADER};
use crate::settings::Settings;
use chrono::Utc;
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::Client;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};

#[get("/guarded")]
fn guarded(_admin: AdminKey) -> &'static str {
    "ok"
}

#[post("/checked", format = "json", data = "<submission>")]
fn checked(submission: Json<NewPlayoffResult>) -> crate::Result<String> {
    let result = submission.into_inner().validate(Utc::now().naive_utc())?;
    Ok(result.series_id)
}

#[get("/busy")]
fn busy(pipelines: &State<Pipelines>) -> crate::Result<&'static str> {
    let _running = pipelines.claim(Pipeline::BracketScoring)?;
    let _again = pipelines.claim(Pipeline::BracketScoring)?;
    Ok("ok")
}

// Mirrors the launcher minus the database, which none of these routes touch.
fn test_rocket(settings: Settings) -> Rocket<Build> {
    rocket::build()
        .manage(settings)
        .manage(Pipelines::default())
        .register(
            "/",
            catchers![
                catchers::bad_request,
                catchers::not_authorized,
                catchers::not_found,
                catchers::conflict,
                catchers::unprocessable_entity
            ],
        )
        .mount("/api", routes![sys::route::sysinfo, guarded, checked, busy])
}

fn keyed() -> Settings {
    Settings {
        admin_key: String::from("letmein"),
        ..Settings::default()
    }
}

#[test]
fn test_system_api() {
    let client = Client::tracked(test_rocket(Settings::default())).expect("valid rocket instance");
    let response = client.get("/api/sys/info").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let info: PubSysInfo = serde_json::from_str(&response.into_string().unwrap()).unwrap();
    assert_eq!(info, PubSysInfo::new(Settings::default()));
    assert_eq!(info.settings.team_window, 14);
    assert_eq!(info.settings.pitcher_window, 5);
}

#[test]
fn test_system_api_hides_admin_key() {
    let client = Client::tracked(test_rocket(keyed())).expect("valid rocket instance");
    let body = client.get("/api/sys/info").dispatch().into_string().unwrap();
    assert!(!body.contains("letmein"));
}

#[test]
fn test_admin_key_required() {
    let client = Client::tracked(test_rocket(keyed())).expect("valid rocket instance");

    let missing = client.get("/api/guarded").dispatch();
    assert_eq!(missing.status(), Status::Unauthorized);
    assert_eq!(
        serde_json::from_str::<Httperror>(&missing.into_string().unwrap()).unwrap(),
        Httperror { status: 401 }
    );

    let wrong = client
        .get("/api/guarded")
        .header(Header::new(ADMIN_KEY_HEADER, "guess"))
        .dispatch();
    assert_eq!(wrong.status(), Status::Unauthorized);

    let right = client
        .get("/api/guarded")
        .header(Header::new(ADMIN_KEY_HEADER, "letmein"))
        .dispatch();
    assert_eq!(right.status(), Status::Ok);
    assert_eq!(right.into_string().unwrap(), "ok");
}

#[test]
fn test_admin_key_unset_locks_routes() {
    let client = Client::tracked(test_rocket(Settings::default())).expect("valid rocket instance");
    let response = client
        .get("/api/guarded")
        .header(Header::new(ADMIN_KEY_HEADER, ""))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
}

#[test]
fn test_not_found_catcher() {
    let client = Client::tracked(test_rocket(Settings::default())).expect("valid rocket instance");
    let response = client.get("/api/nowhere").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(
        serde_json::from_str::<Httperror>(&response.into_string().unwrap()).unwrap(),
        Httperror { status: 404 }
    );
}

fn status_body(body: Option<String>) -> Httperror {
    serde_json::from_str(&body.unwrap()).unwrap()
}

#[test]
fn test_invalid_submission_is_bad_request() {
    let client = Client::tracked(test_rocket(Settings::default())).expect("valid rocket instance");

    let accepted = client
        .post("/api/checked")
        .header(ContentType::JSON)
        .body(r#"{"series_id":"2025-WS","round":"world_series","winning_team_id":119,"losing_team_id":141}"#)
        .dispatch();
    assert_eq!(accepted.status(), Status::Ok);
    assert_eq!(accepted.into_string().unwrap(), "2025-WS");

    // well-formed JSON with a field of the wrong type
    let mistyped = client
        .post("/api/checked")
        .header(ContentType::JSON)
        .body(r#"{"series_id":"2025-WS","round":"world_series","winning_team_id":"abc"}"#)
        .dispatch();
    assert_eq!(mistyped.status(), Status::BadRequest);
    assert_eq!(status_body(mistyped.into_string()), Httperror { status: 400 });

    let missing = client
        .post("/api/checked")
        .header(ContentType::JSON)
        .body(r#"{"series_id":"2025-WS","round":"world_series"}"#)
        .dispatch();
    assert_eq!(missing.status(), Status::BadRequest);
    assert_eq!(status_body(missing.into_string()), Httperror { status: 400 });

    let self_win = client
        .post("/api/checked")
        .header(ContentType::JSON)
        .body(r#"{"series_id":"2025-WS","round":"world_series","winning_team_id":119,"losing_team_id":119}"#)
        .dispatch();
    assert_eq!(self_win.status(), Status::BadRequest);
}

#[test]
fn test_pipeline_already_running_is_conflict() {
    let client = Client::tracked(test_rocket(Settings::default())).expect("valid rocket instance");
    let response = client.get("/api/busy").dispatch();
    assert_eq!(response.status(), Status::Conflict);
    assert_eq!(status_body(response.into_string()), Httperror { status: 409 });
}
