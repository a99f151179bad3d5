//! Availability search and room selection: the first steps of the booking
//! flow.
//!
//! Each step writes the [`PendingReservation`] draft that the reservation
//! form picks up.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use bookings_core::stay::{parse_date, StayDates};
use bookings_core::types::DbId;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppResult;
use crate::response::Page;
use crate::session::{self, PendingReservation};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Form body for `POST /search-availability`.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// Form body for `POST /search-availability-json`.
#[derive(Debug, Deserialize)]
pub struct RoomSearchForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub room_id: String,
}

/// Answer to a single-room availability check.
#[derive(Debug, Serialize)]
pub struct AvailabilityJson {
    pub ok: bool,
    pub message: String,
    pub room_id: String,
    pub start_date: String,
    pub end_date: String,
}

impl AvailabilityJson {
    fn failed(message: &str) -> Json<Self> {
        Json(Self {
            ok: false,
            message: message.to_string(),
            room_id: String::new(),
            start_date: String::new(),
            end_date: String::new(),
        })
    }
}

/// Query string of `GET /book-room`.
#[derive(Debug, Deserialize)]
pub struct BookRoomQuery {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub s: String,
    #[serde(default)]
    pub e: String,
}

/// Picture and blurb shown next to each room on the choose-room page.
#[derive(Debug, Clone, Serialize)]
pub struct RoomInfo {
    pub image: &'static str,
    pub description: &'static str,
}

fn room_info() -> BTreeMap<DbId, RoomInfo> {
    BTreeMap::from([
        (
            1,
            RoomInfo {
                image: "generals-quarters.png",
                description: "Dark mahogany, a wide hearth, and the relics of old campaigns.",
            },
        ),
        (
            2,
            RoomInfo {
                image: "majors-suite.png",
                description: "Soft twilight colours, silk drapes, and a quiet reading corner.",
            },
        ),
    ])
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /search-availability
pub async fn search_page(session: Session) -> AppResult<Json<Page>> {
    Page::new("search-availability.page.tmpl").render(&session).await
}

/// POST /search-availability
///
/// Lists every room free for the requested stay and starts a new draft.
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SearchForm>,
) -> AppResult<Response> {
    let start = match parse_date(&form.start) {
        Ok(d) => d,
        Err(_) => {
            return session::redirect_post_with_error(&session, "Can't parse start date", "/").await;
        }
    };
    let end = match parse_date(&form.end) {
        Ok(d) => d,
        Err(_) => {
            return session::redirect_post_with_error(&session, "Can't parse end date", "/").await;
        }
    };
    let stay = match StayDates::new(start, end) {
        Ok(stay) => stay,
        Err(e) => {
            session::put_error(&session, e.to_string()).await?;
            return Ok(Redirect::to("/search-availability").into_response());
        }
    };

    let rooms = match state.availability.available_rooms(&stay).await {
        Ok(rooms) => rooms,
        Err(e) => {
            tracing::error!(error = %e, "Availability search failed");
            return session::redirect_post_with_error(
                &session,
                "Can't get availability for rooms",
                "/",
            )
            .await;
        }
    };

    if rooms.is_empty() {
        session::put_error(&session, "No availability").await?;
        return Ok(Redirect::to("/search-availability").into_response());
    }

    PendingReservation::new(stay.start(), stay.end())
        .store(&session)
        .await?;

    let page = Page::new("choose-room.page.tmpl")
        .with_data("rooms", &rooms)?
        .with_data("room_info", &room_info())?;
    Ok(page.render(&session).await?.into_response())
}

/// POST /search-availability-json
///
/// Checks one room for one stay. Every outcome is a 200 with `ok` telling
/// the caller whether the room is free.
pub async fn search_json(
    State(state): State<AppState>,
    Form(form): Form<RoomSearchForm>,
) -> Json<AvailabilityJson> {
    let Ok(start) = parse_date(&form.start) else {
        return AvailabilityJson::failed("invalid start date");
    };
    let Ok(end) = parse_date(&form.end) else {
        return AvailabilityJson::failed("invalid end date");
    };
    let Ok(room_id) = form.room_id.trim().parse::<DbId>() else {
        return AvailabilityJson::failed("invalid room id");
    };
    let stay = match StayDates::new(start, end) {
        Ok(stay) => stay,
        Err(e) => return AvailabilityJson::failed(&e.to_string()),
    };

    let available = match state.availability.room_is_available(room_id, &stay).await {
        Ok(available) => available,
        Err(e) => {
            tracing::error!(room_id, error = %e, "Single-room availability check failed");
            return AvailabilityJson::failed("error querying database");
        }
    };

    Json(AvailabilityJson {
        ok: available,
        message: String::new(),
        room_id: room_id.to_string(),
        start_date: form.start,
        end_date: form.end,
    })
}

/// GET /choose-room/{id}
///
/// Attaches the chosen room to the current draft.
pub async fn choose_room(session: Session, Path(raw_id): Path<String>) -> AppResult<Response> {
    let Ok(room_id) = raw_id.parse::<DbId>() else {
        return session::redirect_with_error(&session, "Missing url parameter", "/").await;
    };

    let Some(mut draft) = PendingReservation::load(&session).await?.present() else {
        return session::redirect_with_error(&session, "Can't get reservation from session", "/")
            .await;
    };

    draft.room_id = Some(room_id);
    draft.room_name = None;
    draft.store(&session).await?;

    Ok(Redirect::to("/make-reservation").into_response())
}

/// GET /book-room?id=&s=&e=
///
/// Starts a draft from a room page link, skipping the search step.
pub async fn book_room(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<BookRoomQuery>,
) -> AppResult<Response> {
    let parsed = query
        .id
        .parse::<DbId>()
        .ok()
        .zip(StayDates::parse(&query.s, &query.e).ok());
    let Some((room_id, stay)) = parsed else {
        return session::redirect_with_error(&session, "Can't parse booking link", "/").await;
    };

    let room = match state.reservations.find_room(room_id).await {
        Ok(Some(room)) => room,
        Ok(None) => {
            return session::redirect_with_error(&session, "Can't find room", "/").await;
        }
        Err(e) => {
            tracing::error!(room_id, error = %e, "Room lookup failed");
            return session::redirect_with_error(&session, "Can't get room from database", "/")
                .await;
        }
    };

    let mut draft = PendingReservation::new(stay.start(), stay.end());
    draft.room_id = Some(room.id);
    draft.room_name = Some(room.room_name);
    draft.store(&session).await?;

    Ok(Redirect::to("/make-reservation").into_response())
}
