//! Integration tests for `POST /search-availability-json`.

mod common;

use axum::http::StatusCode;
use bookings_core::stay::parse_date;
use bookings_db::store::AvailabilityStore;

async fn block_room_one(app: &common::TestApp) {
    // [2025-01-10, 2025-01-15) via five single-day owner blocks.
    let mut day = parse_date("2025-01-10").unwrap();
    while day < parse_date("2025-01-15").unwrap() {
        app.store.insert_block(1, day).await.unwrap();
        day = day.succ_opt().unwrap();
    }
}

#[tokio::test]
async fn overlapping_stay_is_unavailable() {
    let app = common::build_test_app();
    block_room_one(&app).await;

    let response = app
        .client()
        .post_form(
            "/search-availability-json",
            &[("start", "2025-01-12"), ("end", "2025-01-13"), ("room_id", "1")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], false);
    assert_eq!(response.body["room_id"], "1");
}

#[tokio::test]
async fn checkout_day_is_available() {
    let app = common::build_test_app();
    block_room_one(&app).await;

    let response = app
        .client()
        .post_form(
            "/search-availability-json",
            &[("start", "2025-01-15"), ("end", "2025-01-16"), ("room_id", "1")],
        )
        .await;

    assert_eq!(response.body["ok"], true);
    assert_eq!(response.body["message"], "");
    assert_eq!(response.body["start_date"], "2025-01-15");
    assert_eq!(response.body["end_date"], "2025-01-16");
}

#[tokio::test]
async fn other_rooms_are_unaffected() {
    let app = common::build_test_app();
    block_room_one(&app).await;

    let response = app
        .client()
        .post_form(
            "/search-availability-json",
            &[("start", "2025-01-12"), ("end", "2025-01-13"), ("room_id", "2")],
        )
        .await;
    assert_eq!(response.body["ok"], true);
}

#[tokio::test]
async fn bad_input_is_reported_in_the_message() {
    let app = common::build_test_app();
    let mut client = app.client();

    let cases = [
        (("nope", "2025-01-13", "1"), "invalid start date"),
        (("2025-01-12", "", "1"), "invalid end date"),
        (("2025-01-12", "2025-01-13", "x"), "invalid room id"),
    ];
    for ((start, end, room_id), message) in cases {
        let response = client
            .post_form(
                "/search-availability-json",
                &[("start", start), ("end", end), ("room_id", room_id)],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["ok"], false);
        assert_eq!(response.body["message"], message);
    }
}

#[tokio::test]
async fn store_failure_is_reported_not_raised() {
    let app = common::build_test_app();
    app.store.set_offline(true);

    let response = app
        .client()
        .post_form(
            "/search-availability-json",
            &[("start", "2025-01-12"), ("end", "2025-01-13"), ("room_id", "1")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], false);
    assert_eq!(response.body["message"], "error querying database");
}
