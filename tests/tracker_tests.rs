use std::io::Cursor;
use std::time::{Duration, Instant};

use chrono::Utc;
use tempfile::TempDir;

use workout_tracker::catalog::default_catalog;
use workout_tracker::commands::{PROGRESS_LISTING, WORKOUTS_LISTING};
use workout_tracker::progress::persistence::load_progress;
use workout_tracker::recommend::suggest_for_user;
use workout_tracker::{
    handle_line, serve, AppState, Exercise, Intensity, ProgressStore, Settings, TrackerError,
    WorkoutPlan,
};

fn create_state(ttl: Duration) -> (AppState, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = ProgressStore::open(&dir.path().join("userProgress.json")).unwrap();
    (AppState::new(store, default_catalog(), ttl), dir)
}

fn push_up_plan(id: &str) -> WorkoutPlan {
    WorkoutPlan {
        id: id.to_string(),
        date: Utc::now(),
        exercises: vec![Exercise::new("Push-ups", 3, 15, Intensity::Medium)],
        goal: "Strength".to_string(),
    }
}

fn body(line: &str, state: &AppState) -> (u16, serde_json::Value) {
    let response = handle_line(state, line);
    let value = serde_json::from_str(&response.body).expect("body must be JSON");
    (response.status, value)
}

#[test]
fn test_log_then_suggest_end_to_end() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    state.store.add_log("u1", push_up_plan("1")).unwrap();

    let suggested = suggest_for_user(&state.store, "u1").expect("history exists");
    assert_eq!(suggested.id, "1-new");
    assert_eq!(suggested.goal, "Strength");
    assert_eq!(suggested.exercises.len(), 1);
    assert_eq!(suggested.exercises[0].name, "Push-ups Variation");
    assert_eq!(suggested.exercises[0].intensity, Intensity::High);

    // Suggesting does not log anything
    assert_eq!(state.store.plans_for("u1").len(), 1);
}

#[test]
fn test_mixed_mutation_sequence_order() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    let store = &state.store;
    for id in ["a", "b", "c", "d"] {
        store.add_log("u1", push_up_plan(id)).unwrap();
    }
    store.delete_log("u1", "b").unwrap();
    store
        .update_log("u1", "c", vec![Exercise::new("Dips", 2, 8, Intensity::Low)])
        .unwrap();
    store.add_log("u1", push_up_plan("e")).unwrap();
    store.delete_log("u1", "a").unwrap();

    let plans = store.plans_for("u1");
    let ids: Vec<&str> = plans.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "d", "e"]);
    assert_eq!(plans[0].exercises[0].name, "Dips");

    let on_disk = load_progress(store.path()).unwrap();
    assert_eq!(on_disk, store.snapshot());
}

#[test]
fn test_dispatch_add_and_suggest() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    let add = r#"{"op":"add_log","user_id":"u1","plan":{"id":"1","date":"2024-01-01T10:00:00Z",
        "exercises":[{"name":"Push-ups","sets":3,"reps":15,"intensity":"Medium"}],"goal":"Strength"}}"#;
    let (status, echoed) = body(&add.replace('\n', ""), &state);
    assert_eq!(status, 200);
    assert_eq!(echoed["id"], "1");

    let (status, plan) = body(r#"{"op":"suggest","user_id":"u1"}"#, &state);
    assert_eq!(status, 200);
    assert_eq!(plan["id"], "1-new");
    assert_eq!(plan["goal"], "Strength");
    assert_eq!(plan["exercises"][0]["name"], "Push-ups Variation");
    assert_eq!(plan["exercises"][0]["intensity"], "High");
    assert_eq!(plan["exercises"][0]["sets"], 3);
}

#[test]
fn test_dispatch_suggest_without_history_is_null() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    let (status, plan) = body(r#"{"op":"suggest","user_id":"nobody"}"#, &state);
    assert_eq!(status, 200);
    assert!(plan.is_null());

    let (status, last) = body(r#"{"op":"last_plan","user_id":"nobody"}"#, &state);
    assert_eq!(status, 200);
    assert!(last.is_null());
}

#[test]
fn test_dispatch_delete_missing_is_404() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    state.store.add_log("u1", push_up_plan("1")).unwrap();

    let (status, error) = body(
        r#"{"op":"delete_log","user_id":"u1","plan_id":"missing-id"}"#,
        &state,
    );
    assert_eq!(status, 404);
    assert!(error["error"].as_str().unwrap().contains("not found"));
    assert_eq!(state.store.plans_for("u1").len(), 1);

    let result = state.store.delete_log("u1", "missing-id");
    assert!(matches!(result, Err(TrackerError::NotFound { .. })));
}

#[test]
fn test_dispatch_update_and_append() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    state.store.add_log("u1", push_up_plan("1")).unwrap();

    let (status, _) = body(
        r#"{"op":"update_log","user_id":"u1","plan_id":"1","exercises":[{"name":"Push-ups","sets":4,"reps":20,"intensity":"High"}]}"#,
        &state,
    );
    assert_eq!(status, 200);

    let (status, _) = body(
        r#"{"op":"append_exercise","user_id":"u1","plan_id":"1","exercise":{"name":"Plank","sets":3,"reps":1,"intensity":"Low","feedback":{"difficulty":"Easy","effectiveness":"Medium"}}}"#,
        &state,
    );
    assert_eq!(status, 200);

    let (_, history) = body(r#"{"op":"history","user_id":"u1"}"#, &state);
    let exercises = history[0]["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["sets"], 4);
    assert_eq!(exercises[1]["feedback"]["difficulty"], "Easy");

    let (status, _) = body(
        r#"{"op":"update_log","user_id":"ghost","plan_id":"1","exercises":[]}"#,
        &state,
    );
    assert_eq!(status, 404);
}

#[test]
fn test_malformed_requests_are_400() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    let rejected = handle_line(&state, "not json");
    assert!(!rejected.is_success());
    assert_eq!(rejected.status, 400);
    assert_eq!(handle_line(&state, r#"{"op":"fly_to_moon"}"#).status, 400);
    assert_eq!(
        handle_line(
            &state,
            r#"{"op":"append_exercise","user_id":"u1","plan_id":"1","exercise":{"name":"X","sets":1,"reps":1,"intensity":"Extreme"}}"#
        )
        .status,
        400
    );
    assert_eq!(
        handle_line(&state, r#"{"op":"submit_workout_data","payload":{"duration":"long"}}"#).status,
        400
    );
}

#[test]
fn test_zero_volume_exercise_is_400_and_not_stored() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    let response = handle_line(
        &state,
        r#"{"op":"add_log","user_id":"u1","plan":{"id":"1","exercises":[{"name":"Push-ups","sets":0,"reps":0,"intensity":"Low"}],"goal":"Strength"}}"#,
    );
    assert_eq!(response.status, 400);
    assert!(state.store.get_last_plan("u1").is_none());
    assert_eq!(state.store.user_count(), 0);
}

#[test]
fn test_persist_failure_is_500_and_store_keeps_working() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file").unwrap();
    let store = ProgressStore::with_users(&blocker.join("progress.json"), Vec::new());
    let state = AppState::new(store, default_catalog(), Duration::from_secs(30));

    let response = workout_tracker::dispatch(
        &state,
        serde_json::from_str(r#"{"op":"add_log","user_id":"u1","plan":{"id":"1","exercises":[],"goal":"Rest"}}"#)
            .unwrap(),
    );
    assert_eq!(response.status, 500);

    // In-memory state was applied and is still readable
    let (status, last) = body(r#"{"op":"last_plan","user_id":"u1"}"#, &state);
    assert_eq!(status, 200);
    assert_eq!(last["id"], "1");
}

#[test]
fn test_progress_listing_respects_ttl() {
    let ttl = Duration::from_secs(30);
    let (state, _dir) = create_state(ttl);
    state.store.add_log("u1", push_up_plan("1")).unwrap();

    let start = Instant::now();
    let first = state.listings.get_at(PROGRESS_LISTING, start).unwrap().unwrap();

    state.store.add_log("u1", push_up_plan("2")).unwrap();
    let within = state
        .listings
        .get_at(PROGRESS_LISTING, start + Duration::from_secs(10))
        .unwrap()
        .unwrap();
    assert_eq!(first, within);

    let after = state
        .listings
        .get_at(PROGRESS_LISTING, start + ttl + Duration::from_secs(1))
        .unwrap()
        .unwrap();
    let users: Vec<workout_tracker::UserProgress> = serde_json::from_str(&after).unwrap();
    assert_eq!(users[0].workout_plans.len(), 2);
}

#[test]
fn test_catalog_listings_via_dispatch() {
    let (state, _dir) = create_state(Duration::from_secs(30));

    let (status, workouts) = body(r#"{"op":"list_workouts"}"#, &state);
    assert_eq!(status, 200);
    assert_eq!(workouts[0]["title"], "Beginner Routine");
    assert_eq!(workouts[0]["exercises"][0]["description"], "Standard push-ups");

    let (_, goals) = body(r#"{"op":"list_goals"}"#, &state);
    assert_eq!(goals[0]["userId"], "42");

    let (_, trainers) = body(r#"{"op":"list_personal_trainers"}"#, &state);
    assert_eq!(trainers[0]["name"], "John Doe");

    let (_, progress) = body(r#"{"op":"list_progress"}"#, &state);
    assert_eq!(progress, serde_json::json!([]));

    // Served from the same refresh as the listing above
    let cached = state.listings.get(WORKOUTS_LISTING).unwrap().unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&cached).unwrap(), workouts);
}

#[test]
fn test_submissions_are_memoized_and_counted() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    let workout = r#"{"op":"submit_workout_data","payload":{"duration":45,"intensity":"high","type":"cardio"}}"#;

    let first = handle_line(&state, workout);
    let second = handle_line(&state, workout);
    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(first.body, second.body);
    assert_eq!(state.workout_submissions.len(), 1);

    let echoed: serde_json::Value = serde_json::from_str(&first.body).unwrap();
    assert_eq!(echoed, serde_json::json!({"duration": 45.0, "intensity": "high", "type": "cardio"}));

    let goals = handle_line(
        &state,
        r#"{"op":"submit_user_goals","payload":{"weeklyDurationGoal":150,"typeGoal":"strength"}}"#,
    );
    let echoed: serde_json::Value = serde_json::from_str(&goals.body).unwrap();
    assert_eq!(echoed, serde_json::json!({"weeklyDurationGoal": 150.0, "typeGoal": "strength"}));
    assert_eq!(state.goal_submissions.len(), 1);
    assert!(state.workout_submissions.len() == 1);

    let (_, metrics) = body(r#"{"op":"metrics"}"#, &state);
    assert_eq!(metrics["workout_submissions"], 2);
    assert_eq!(metrics["goals_submissions"], 1);
}

#[test]
fn test_serve_loop_answers_each_line() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    let input = concat!(
        r#"{"op":"add_log","user_id":"u1","plan":{"id":"1","exercises":[],"goal":"Cardio"}}"#,
        "\n\n",
        "garbage\n",
        r#"{"op":"history","user_id":"u1"}"#,
        "\n",
    );
    let mut output = Vec::new();

    let handled = serve(&state, Cursor::new(input), &mut output).unwrap();
    assert_eq!(handled, 3);

    let lines: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines[0]["status"], 200);
    assert_eq!(lines[1]["status"], 400);
    assert_eq!(lines[2]["body"][0]["goal"], "Cardio");
}

#[test]
fn test_serve_loop_survives_invalid_utf8() {
    let (state, _dir) = create_state(Duration::from_secs(30));
    let mut input = Vec::new();
    input.extend_from_slice(b"{\"op\":\"metrics\"}\n");
    input.extend_from_slice(b"\xff\xfe\n");
    input.extend_from_slice(b"{\"op\":\"metrics\"}\n");
    let mut output = Vec::new();

    let handled = serve(&state, Cursor::new(input), &mut output).unwrap();
    assert_eq!(handled, 3);

    let statuses: Vec<u64> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["status"].as_u64().unwrap())
        .collect();
    assert_eq!(statuses, vec![200, 400, 200]);
}

#[test]
fn test_app_state_opens_from_settings() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("data").join("progress.json");
    {
        let store = ProgressStore::open(&data_file).unwrap();
        store.add_log("u1", push_up_plan("1")).unwrap();
    }
    let settings = Settings {
        data_file: data_file.clone(),
        listing_ttl_secs: 5,
        catalog_file: None,
    };

    let state = AppState::open(&settings).unwrap();
    assert_eq!(state.data_file(), data_file.as_path());
    assert_eq!(state.listings.ttl(), Duration::from_secs(5));
    assert_eq!(state.store.get_last_plan("u1").unwrap().id, "1");
}

#[test]
fn test_app_state_rejects_missing_catalog() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        data_file: dir.path().join("progress.json"),
        listing_ttl_secs: 5,
        catalog_file: Some(dir.path().join("missing.toml")),
    };
    assert!(matches!(AppState::open(&settings), Err(TrackerError::Config(_))));
}
