//! Handlers for the `/admin` area.
//!
//! Every handler takes [`RequireAdmin`], so non-admin sessions are sent to
//! the login page before any store call is made.

use std::collections::{BTreeMap, HashMap};

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use bookings_core::calendar::{DayMap, MonthView};
use bookings_core::error::CoreError;
use bookings_core::guest::GuestDetails;
use bookings_core::stay::format_date;
use bookings_core::types::DbId;
use bookings_db::models::reservation::{Reservation, ReservationFilter, UpdateGuest};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use crate::booking::BlockEdits;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireAdmin;
use crate::response::Page;
use crate::session::{self, block_map_key};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// `?y=&m=` carried by links that came from the calendar.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub y: Option<String>,
    pub m: Option<String>,
}

impl CalendarQuery {
    /// The requested month, or `None` when no year was given.
    fn month(&self) -> AppResult<Option<MonthView>> {
        let Some(year) = self.y.as_deref().filter(|y| !y.is_empty()) else {
            return Ok(None);
        };
        let month = self.m.as_deref().unwrap_or_default();
        let year = year
            .parse::<i32>()
            .map_err(|_| AppError::BadRequest(format!("Invalid year '{year}'")))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| AppError::BadRequest(format!("Invalid month '{month}'")))?;
        Ok(Some(MonthView::new(year, month)?))
    }
}

/// Form body for the admin guest edit.
#[derive(Debug, Deserialize)]
pub struct EditReservationForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub m: Option<String>,
}

impl EditReservationForm {
    fn guest(&self) -> GuestDetails {
        GuestDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_filter(src: &str) -> AppResult<ReservationFilter> {
    ReservationFilter::from_src(src)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown reservation list '{src}'")))
}

/// Where to go after acting on a reservation: back to the calendar month it
/// was opened from, otherwise back to the list.
fn back_to(src: &str, month: Option<MonthView>) -> String {
    match month {
        Some(month) if src == "cal" => calendar_url(&month),
        _ => format!("/admin/reservations/{src}"),
    }
}

fn calendar_url(month: &MonthView) -> String {
    format!(
        "/admin/reservations/cal?y={}&m={}",
        month.year(),
        month.month()
    )
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Reservation",
        id,
    })
}

fn show_page(
    src: &str,
    query: &CalendarQuery,
    reservation: &Reservation,
) -> AppResult<Page> {
    Page::new("admin-reservations-show.page.tmpl")
        .with_string("src", src)
        .with_string("year", query.y.clone().unwrap_or_default())
        .with_string("month", query.m.clone().unwrap_or_default())
        .with_data("reservation", reservation)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /admin/dashboard
pub async fn dashboard(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Page>> {
    let mut page = Page::new("admin-dashboard.page.tmpl");
    if let Some(admin) = state.users.find_user_by_id(user.user_id).await? {
        page = page.with_string("user_name", format!("{} {}", admin.first_name, admin.last_name));
    }
    page.render(&session).await
}

/// GET /admin/reservations/{src}
///
/// `src` is `all` or `new` (unprocessed only).
pub async fn list_reservations(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(src): Path<String>,
) -> AppResult<Json<Page>> {
    let filter = parse_filter(&src)?;
    let reservations = state.reservations.list_reservations(filter).await?;

    let template = match filter {
        ReservationFilter::All => "admin-all-reservations.page.tmpl",
        ReservationFilter::New => "admin-new-reservations.page.tmpl",
    };
    Page::new(template)
        .with_string("src", filter.as_src())
        .with_data("reservations", &reservations)?
        .render(&session)
        .await
}

/// GET /admin/reservations/{src}/{id}/show
pub async fn show_reservation(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, DbId)>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<Page>> {
    let reservation = state
        .reservations
        .find_reservation(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    show_page(&src, &query, &reservation)?
        .render(&session)
        .await
}

/// POST /admin/reservations/{src}/{id}/show
///
/// Saves guest contact edits. Invalid input re-displays the page with
/// per-field messages.
pub async fn update_reservation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, DbId)>,
    Form(form): Form<EditReservationForm>,
) -> AppResult<Response> {
    let query = CalendarQuery {
        y: form.y.clone(),
        m: form.m.clone(),
    };
    let guest = form.guest();

    if let Err(errors) = guest.check() {
        let mut reservation = state
            .reservations
            .find_reservation(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        reservation.first_name = guest.first_name;
        reservation.last_name = guest.last_name;
        reservation.email = guest.email;
        reservation.phone = guest.phone;

        let page = show_page(&src, &query, &reservation)?.with_form_errors(errors);
        return Ok(page.render(&session).await?.into_response());
    }

    state
        .reservations
        .update_guest(id, &UpdateGuest::from(guest))
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(reservation_id = id, admin_id = admin.user_id, "Reservation guest updated");

    session::redirect_with_flash(&session, "Changes saved", &back_to(&src, query.month()?)).await
}

/// GET /admin/process-reservation/{src}/{id}
pub async fn process_reservation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, DbId)>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Response> {
    if !state.reservations.set_processed(id, true).await? {
        return Err(not_found(id));
    }
    tracing::info!(reservation_id = id, admin_id = admin.user_id, "Reservation processed");

    session::redirect_with_flash(
        &session,
        "Reservation marked as processed",
        &back_to(&src, query.month()?),
    )
    .await
}

/// GET /admin/delete-reservation/{src}/{id}
pub async fn delete_reservation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, DbId)>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Response> {
    if !state.reservations.delete_reservation(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(reservation_id = id, admin_id = admin.user_id, "Reservation deleted");

    session::redirect_with_flash(&session, "Reservation deleted", &back_to(&src, query.month()?))
        .await
}

/// GET /admin/reservations/cal?y=&m=
///
/// Month grid for every room. Each room's block map is also kept in the
/// session so the following POST can tell which blocks were unticked.
pub async fn calendar(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<Page>> {
    let month = match query.month()? {
        Some(month) => month,
        None => MonthView::containing(Utc::now().date_naive()),
    };
    let next = month.next();
    let last = month.previous();

    let calendars = state.calendar.month(&month).await?;
    let rooms: Vec<_> = calendars.iter().map(|c| &c.room).collect();

    let mut page = Page::new("admin-reservations-calendar.page.tmpl")
        .with_string("next_month", format!("{:02}", next.month()))
        .with_string("next_month_year", next.year().to_string())
        .with_string("last_month", format!("{:02}", last.month()))
        .with_string("last_month_year", last.year().to_string())
        .with_string("this_month", format!("{:02}", month.month()))
        .with_string("this_month_year", month.year().to_string())
        .with_int("days_in_month", i64::from(month.days_in_month()))
        .with_data("now", &format_date(month.first()))?
        .with_data("rooms", &rooms)?;

    for calendar in &calendars {
        let room_id = calendar.room.id;
        page = page
            .with_data(
                format!("reservation_map_{room_id}"),
                &calendar.maps.reservation_map,
            )?
            .with_data(block_map_key(room_id), &calendar.maps.block_map)?;
        session
            .insert(&block_map_key(room_id), &calendar.maps.block_map)
            .await?;
    }

    page.render(&session).await
}

/// POST /admin/reservations/cal
///
/// Applies block edits against the block maps stored by the last calendar
/// view, then returns to the posted month.
pub async fn update_calendar(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Response> {
    let query = CalendarQuery {
        y: form.get("y").cloned(),
        m: form.get("m").cloned(),
    };
    let month = query
        .month()?
        .ok_or_else(|| AppError::BadRequest("Missing calendar year".to_string()))?;

    let mut prior: BTreeMap<DbId, DayMap> = BTreeMap::new();
    for room in state.reservations.all_rooms().await? {
        if let Some(block_map) = session::read::<DayMap>(&session, &block_map_key(room.id))
            .await?
            .present()
        {
            prior.insert(room.id, block_map);
        }
    }

    let edits = BlockEdits::from_form(form.keys())?;
    let summary = state.calendar.apply_block_edits(&prior, &edits).await?;
    tracing::info!(
        admin_id = admin.user_id,
        removed = summary.removed,
        added = summary.added,
        "Calendar blocks updated"
    );

    session::redirect_with_flash(&session, "Changes saved", &calendar_url(&month)).await
}
