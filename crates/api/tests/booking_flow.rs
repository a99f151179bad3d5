//! Integration tests for the guest booking flow: search, choose a room,
//! submit the reservation form, and view the summary.

mod common;

use axum::http::StatusCode;
use bookings_core::stay::parse_date;
use bookings_db::models::reservation::ReservationFilter;
use bookings_db::store::{AvailabilityStore, ReservationStore};
use common::{TestApp, TestClient};

const GUEST: [(&str, &str); 4] = [
    ("first_name", "Joe"),
    ("last_name", "Joyson"),
    ("email", "joe@example.com"),
    ("phone", "555-555-5555"),
];

/// Search for 2025-02-01..03 and pick room 1.
async fn start_draft(client: &mut TestClient) {
    let response = client
        .post_form(
            "/search-availability",
            &[("start", "2025-02-01"), ("end", "2025-02-03")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["template"], "choose-room.page.tmpl");

    let response = client.get("/choose-room/1").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/make-reservation"));
}

async fn error_on_home(client: &mut TestClient) -> String {
    let response = client.get("/").await;
    response.body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn search_lists_free_rooms_in_id_order() {
    let app = common::build_test_app();
    let response = app
        .client()
        .post_form(
            "/search-availability",
            &[("start", "2025-02-01"), ("end", "2025-02-03")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let rooms = response.body["data"]["rooms"].as_array().unwrap();
    let ids: Vec<i64> = rooms.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(response.body["data"]["room_info"]["1"]["image"].is_string());
}

#[tokio::test]
async fn full_booking_creates_reservation_and_restriction() {
    let app = common::build_test_app();
    let mut client = app.client();
    start_draft(&mut client).await;

    let response = client.get("/make-reservation").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["template"], "make-reservation.page.tmpl");
    assert_eq!(response.body["string_map"]["start_date"], "2025-02-01");
    assert_eq!(response.body["string_map"]["end_date"], "2025-02-03");
    assert_eq!(
        response.body["data"]["reservation"]["room_name"],
        "General's Quarters"
    );

    let response = client.post_form("/make-reservation", &GUEST).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/reservation-summary"));

    let stored = app
        .store
        .list_reservations(ReservationFilter::All)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].room_id, 1);
    assert_eq!(stored[0].start_date, parse_date("2025-02-01").unwrap());
    assert_eq!(stored[0].end_date, parse_date("2025-02-03").unwrap());

    let restrictions = app
        .store
        .restrictions_for_room(
            1,
            parse_date("2025-02-01").unwrap(),
            parse_date("2025-02-28").unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(restrictions.len(), 1);
    assert_eq!(restrictions[0].reservation_id, Some(stored[0].id));
    assert_eq!(restrictions[0].start_date, stored[0].start_date);
    assert_eq!(restrictions[0].end_date, stored[0].end_date);

    let response = client.get("/reservation-summary").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["template"], "reservation-summary.page.tmpl");
    assert_eq!(
        response.body["data"]["reservation"]["reservation_id"],
        stored[0].id
    );
    assert_eq!(
        response.body["data"]["reservation"]["guest"]["email"],
        "joe@example.com"
    );

    // The summary consumes the draft.
    let response = client.get("/reservation-summary").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location.as_deref(), Some("/"));
}

#[tokio::test]
async fn booking_queues_guest_and_owner_mail() {
    let app = common::build_test_app();
    let mut client = app.client();
    start_draft(&mut client).await;
    client.post_form("/make-reservation", &GUEST).await;

    let sent = app.wait_for_mail(2).await;
    assert_eq!(sent.len(), 2);

    let guest = sent.iter().find(|m| m.to == "joe@example.com").unwrap();
    assert_eq!(guest.subject, "Reservation Confirmation");
    assert_eq!(guest.template.as_deref(), Some("basic.html"));

    let owner = sent
        .iter()
        .find(|m| m.to == "owner@fortsmythe.test")
        .unwrap();
    assert_eq!(owner.subject, "Reservation Notification");
    assert!(owner.content.contains("General&#39;s Quarters"));
}

#[tokio::test]
async fn invalid_guest_details_redisplay_the_form() {
    let app = common::build_test_app();
    let mut client = app.client();
    start_draft(&mut client).await;

    let response = client
        .post_form(
            "/make-reservation",
            &[
                ("first_name", "Jo"),
                ("last_name", "Joyson"),
                ("email", "not-an-email"),
                ("phone", "555-555-5555"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["template"], "make-reservation.page.tmpl");
    assert!(response.body["form_errors"]["first_name"].is_array());
    assert!(response.body["form_errors"]["email"].is_array());
    assert!(response.body["form_errors"].get("phone").is_none());
    assert_eq!(
        response.body["data"]["reservation"]["guest"]["first_name"],
        "Jo"
    );
    assert_eq!(app.store.restriction_count().await, 0);
}

#[tokio::test]
async fn posting_without_a_draft_redirects_home_with_error() {
    let app = common::build_test_app();
    let mut client = app.client();

    let response = client.post_form("/make-reservation", &GUEST).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert_eq!(
        error_on_home(&mut client).await,
        "Can't get reservation from session"
    );
    assert_eq!(app.store.restriction_count().await, 0);
}

#[tokio::test]
async fn form_page_without_a_draft_redirects_home() {
    let app = common::build_test_app();
    let mut client = app.client();

    let response = client.get("/make-reservation").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location.as_deref(), Some("/"));
}

#[tokio::test]
async fn booking_a_taken_room_sends_guest_back_to_search() {
    let app = common::build_test_app();
    let mut client = app.client();

    let response = client
        .get("/book-room?id=1&s=2025-02-01&e=2025-02-03")
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/make-reservation"));

    // Someone else books an overlapping night first.
    let mut rival = app.client();
    let response = rival.get("/book-room?id=1&s=2025-02-02&e=2025-02-04").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let response = rival
        .post_form(
            "/make-reservation",
            &[
                ("first_name", "Ann"),
                ("last_name", "Rival"),
                ("email", "ann@example.com"),
                ("phone", "555-000-0000"),
            ],
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/reservation-summary"));

    let response = client.post_form("/make-reservation", &GUEST).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/search-availability"));
    assert_eq!(app.store.restriction_count().await, 1);
}

#[tokio::test]
async fn book_room_rejects_bad_links() {
    let app = common::build_test_app();
    let mut client = app.client();

    let response = client.get("/book-room?id=1&s=garbage&e=2025-02-03").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(error_on_home(&mut client).await, "Can't parse booking link");

    let response = client
        .get("/book-room?id=99&s=2025-02-01&e=2025-02-03")
        .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(error_on_home(&mut client).await, "Can't find room");
}

#[tokio::test]
async fn unparsable_search_dates_redirect_home() {
    let app = common::build_test_app();
    let mut client = app.client();

    let response = client
        .post_form(
            "/search-availability",
            &[("start", "02/01/2025"), ("end", "2025-02-03")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert_eq!(error_on_home(&mut client).await, "Can't parse start date");
}

#[tokio::test]
async fn empty_stay_is_rejected_before_searching() {
    let app = common::build_test_app();
    let mut client = app.client();

    let response = client
        .post_form(
            "/search-availability",
            &[("start", "2025-02-01"), ("end", "2025-02-01")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/search-availability"));
}

#[tokio::test]
async fn fully_blocked_dates_report_no_availability() {
    let app = common::build_test_app();
    let day = parse_date("2025-02-01").unwrap();
    app.store.insert_block(1, day).await.unwrap();
    app.store.insert_block(2, day).await.unwrap();
    let mut client = app.client();

    let response = client
        .post_form(
            "/search-availability",
            &[("start", "2025-02-01"), ("end", "2025-02-02")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/search-availability"));

    let response = client.get("/search-availability").await;
    assert_eq!(response.body["error"], "No availability");
}

#[tokio::test]
async fn store_outage_during_search_redirects_home() {
    let app = common::build_test_app();
    app.store.set_offline(true);
    let mut client = app.client();

    let response = client
        .post_form(
            "/search-availability",
            &[("start", "2025-02-01"), ("end", "2025-02-03")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert_eq!(
        error_on_home(&mut client).await,
        "Can't get availability for rooms"
    );
}

#[tokio::test]
async fn failed_form_posts_redirect_with_see_other() {
    let app = common::build_test_app();
    app.store.set_offline(true);
    let mut client = app.client();

    // A 307 would make the browser repeat the POST against a GET-only page.
    for (uri, fields) in [
        ("/search-availability", &[("start", "2025-02-01"), ("end", "2025-02-03")][..]),
        ("/make-reservation", &GUEST[..]),
    ] {
        let response = client.post_form(uri, fields).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(response.location.as_deref(), Some("/"), "{uri}");
    }

    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["template"], "home.page.tmpl");
}

#[tokio::test]
async fn flash_messages_are_shown_once() {
    let app: TestApp = common::build_test_app();
    let mut client = app.client();

    client.get("/make-reservation").await;
    assert!(!error_on_home(&mut client).await.is_empty());
    assert!(error_on_home(&mut client).await.is_empty());
}
