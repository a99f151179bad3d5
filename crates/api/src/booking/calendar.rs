//! Admin calendar: per-room month maps and the block edit flow.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use bookings_core::calendar::{parse_day_key, DayMap, MonthView, RoomMonthMaps};
use bookings_core::error::CoreError;
use bookings_core::types::{Date, DbId};
use bookings_db::models::room::Room;
use bookings_db::store::{AvailabilityStore, ReservationStore, StoreError};

const KEEP_PREFIX: &str = "keep_block_";
const ADD_PREFIX: &str = "add_block_";

/// One room's maps for the displayed month.
#[derive(Debug, Clone)]
pub struct RoomCalendar {
    pub room: Room,
    pub maps: RoomMonthMaps,
}

/// Block checkboxes posted from the calendar form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockEdits {
    /// Existing blocks whose checkbox stayed ticked.
    pub keep: BTreeSet<(DbId, Date)>,
    /// Free days newly ticked.
    pub add: BTreeSet<(DbId, Date)>,
}

impl BlockEdits {
    /// Collect `keep_block_<room>_<day>` and `add_block_<room>_<day>` fields.
    /// Other fields are ignored.
    pub fn from_form<'a, I>(fields: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut edits = Self::default();
        for name in fields {
            if let Some(rest) = name.strip_prefix(KEEP_PREFIX) {
                edits.keep.insert(parse_block_field(name, rest)?);
            } else if let Some(rest) = name.strip_prefix(ADD_PREFIX) {
                edits.add.insert(parse_block_field(name, rest)?);
            }
        }
        Ok(edits)
    }
}

fn parse_block_field(name: &str, rest: &str) -> Result<(DbId, Date), CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid block field '{name}'"));
    let (room, day) = rest.split_once('_').ok_or_else(invalid)?;
    let room_id = room.parse::<DbId>().map_err(|_| invalid())?;
    Ok((room_id, parse_day_key(day)?))
}

/// What a block edit changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockEditSummary {
    pub removed: usize,
    pub added: usize,
}

/// Builds the month grid and applies owner block edits.
#[derive(Clone)]
pub struct CalendarAggregator {
    availability: Arc<dyn AvailabilityStore>,
    reservations: Arc<dyn ReservationStore>,
}

impl CalendarAggregator {
    pub fn new(
        availability: Arc<dyn AvailabilityStore>,
        reservations: Arc<dyn ReservationStore>,
    ) -> Self {
        Self {
            availability,
            reservations,
        }
    }

    /// Reservation and block maps for one room.
    pub async fn room_maps(
        &self,
        room_id: DbId,
        month: &MonthView,
    ) -> Result<RoomMonthMaps, StoreError> {
        let restrictions = self
            .availability
            .restrictions_for_room(room_id, month.first(), month.last())
            .await?;
        Ok(RoomMonthMaps::build(
            month,
            restrictions.iter().map(|r| r.to_calendar()),
        ))
    }

    /// Maps for every room, ID ascending.
    pub async fn month(&self, month: &MonthView) -> Result<Vec<RoomCalendar>, StoreError> {
        let rooms = self.reservations.all_rooms().await?;
        let mut calendars = Vec::with_capacity(rooms.len());
        for room in rooms {
            let maps = self.room_maps(room.id, month).await?;
            calendars.push(RoomCalendar { room, maps });
        }
        Ok(calendars)
    }

    /// Apply posted block edits against the block maps last shown to the admin.
    ///
    /// A day blocked in `prior` whose keep flag was not posted is unblocked.
    /// Rooms absent from `prior` are never unblocked. Every `add` is
    /// inserted without an occupancy check.
    pub async fn apply_block_edits(
        &self,
        prior: &BTreeMap<DbId, DayMap>,
        edits: &BlockEdits,
    ) -> Result<BlockEditSummary, StoreError> {
        let mut summary = BlockEditSummary::default();

        for (&room_id, block_map) in prior {
            for (key, &restriction_id) in block_map {
                if restriction_id <= 0 {
                    continue;
                }
                let Ok(day) = parse_day_key(key) else {
                    tracing::warn!(room_id, key = %key, "Skipping unparsable block map day");
                    continue;
                };
                if edits.keep.contains(&(room_id, day)) {
                    continue;
                }
                if self.availability.delete_block(restriction_id).await? {
                    tracing::info!(room_id, restriction_id, %day, "Owner block removed");
                    summary.removed += 1;
                }
            }
        }

        for &(room_id, day) in &edits.add {
            let block = self.availability.insert_block(room_id, day).await?;
            tracing::info!(room_id, restriction_id = block.id, %day, "Owner block added");
            summary.added += 1;
        }

        Ok(summary)
    }
}
