/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

diesel::table! {
    team_stats (game_id, team_id) {
        game_id -> Int4,
        team_id -> Int4,
        game_date -> Nullable<Date>,
        team_name -> Nullable<Text>,
        is_home -> Nullable<Bool>,
        batting_avg -> Nullable<Float8>,
        obp -> Nullable<Float8>,
        slg -> Nullable<Float8>,
        #[sql_name = "ops"]
        on_base_plus_slugging -> Nullable<Float8>,
        runs_per_game -> Nullable<Float8>,
        strikeouts_per_game -> Nullable<Float8>,
        walks_per_game -> Nullable<Float8>,
        rbi_per_game -> Nullable<Float8>,
        hits_per_game -> Nullable<Float8>,
        left_on_base -> Nullable<Float8>,
        errors_per_game -> Nullable<Float8>,
        def_efficiency -> Nullable<Float8>,
        home_runs_per_game -> Nullable<Float8>,
        bullpen_era -> Nullable<Float8>,
        bullpen_whip -> Nullable<Float8>,
        bullpen_so9 -> Nullable<Float8>,
        bullpen_innings_pitched -> Nullable<Float8>,
        created_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    pitcher_stats (game_id, team_id) {
        game_id -> Int4,
        team_id -> Int4,
        pitcher_id -> Nullable<Int4>,
        pitcher_name -> Nullable<Text>,
        game_date -> Nullable<Date>,
        is_starter -> Nullable<Bool>,
        era -> Nullable<Float8>,
        whip -> Nullable<Float8>,
        so9 -> Nullable<Float8>,
        bb9 -> Nullable<Float8>,
        hr9 -> Nullable<Float8>,
        innings_pitched -> Nullable<Float8>,
        created_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    recent_team_performance (team_id) {
        team_id -> Int4,
        team_name -> Nullable<Text>,
        batting_avg -> Nullable<Float8>,
        obp -> Nullable<Float8>,
        slg -> Nullable<Float8>,
        #[sql_name = "ops"]
        on_base_plus_slugging -> Nullable<Float8>,
        runs_per_game -> Nullable<Float8>,
        strikeouts_per_game -> Nullable<Float8>,
        walks_per_game -> Nullable<Float8>,
        rbi_per_game -> Nullable<Float8>,
        hits_per_game -> Nullable<Float8>,
        left_on_base -> Nullable<Float8>,
        errors_per_game -> Nullable<Float8>,
        def_efficiency -> Nullable<Float8>,
        home_runs_per_game -> Nullable<Float8>,
        bullpen_era -> Nullable<Float8>,
        bullpen_whip -> Nullable<Float8>,
        bullpen_so9 -> Nullable<Float8>,
        bullpen_innings_pitched -> Nullable<Float8>,
        pitcher_era -> Nullable<Float8>,
        pitcher_whip -> Nullable<Float8>,
        pitcher_so9 -> Nullable<Float8>,
        pitcher_bb9 -> Nullable<Float8>,
        pitcher_hr9 -> Nullable<Float8>,
        pitcher_innings_pitched -> Nullable<Float8>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    playoff_results (series_id) {
        series_id -> Text,
        round -> Text,
        winning_team_id -> Int4,
        losing_team_id -> Int4,
        series_end_date -> Nullable<Timestamp>,
        games_won -> Nullable<Int4>,
        games_lost -> Nullable<Int4>,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    playoff_brackets (user_id, year, bracket_name) {
        user_id -> Text,
        year -> Int4,
        bracket_name -> Text,
        al_wildcard_1_winner -> Nullable<Int4>,
        al_wildcard_2_winner -> Nullable<Int4>,
        nl_wildcard_1_winner -> Nullable<Int4>,
        nl_wildcard_2_winner -> Nullable<Int4>,
        al_division_1_winner -> Nullable<Int4>,
        al_division_2_winner -> Nullable<Int4>,
        nl_division_1_winner -> Nullable<Int4>,
        nl_division_2_winner -> Nullable<Int4>,
        al_championship_winner -> Nullable<Int4>,
        nl_championship_winner -> Nullable<Int4>,
        world_series_champion -> Nullable<Int4>,
        points_earned -> Nullable<Int4>,
        last_scored_at -> Nullable<Timestamp>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    team_stats,
    pitcher_stats,
    recent_team_performance,
    playoff_results,
    playoff_brackets,
);
