//! Placement controller: turns a grid click into a room position.
//!
//! The cursor is a non-owning `RoomId`; the registry is the single owner of
//! room data. Rooms never share a cell: a click on a cell held by another
//! room is refused and the cursor stays put.

use serde::Serialize;

use crate::plot::PlotSize;
use crate::rooms::{Position, RoomId, RoomRegistry};
use crate::wizard::Step;

/// What a grid click did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// `room` now sits at the clicked cell; `current` is the cursor after
    /// advancing (unchanged when `room` was the last one).
    Placed {
        room: RoomId,
        position: Position,
        current: RoomId,
    },
    /// No room is selected for placement.
    NoCurrentRoom,
    OutOfBounds { x: u32, y: u32 },
    Occupied { by: RoomId },
    /// A generation request is in flight; edits wait until it settles.
    Busy,
    /// Rooms only move during the design step.
    WrongStep { step: Step },
}

impl PlacementOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed { .. })
    }
}

/// Place the current room at `(x, y)` and advance the cursor.
pub fn place_room(
    rooms: &mut RoomRegistry,
    cursor: &mut Option<RoomId>,
    plot: PlotSize,
    x: u32,
    y: u32,
) -> PlacementOutcome {
    let Some(current) = cursor.clone() else {
        return PlacementOutcome::NoCurrentRoom;
    };
    if !plot.contains(x, y) {
        return PlacementOutcome::OutOfBounds { x, y };
    }
    let position = Position { x, y };
    if let Some(other) = rooms.occupant_at(position) {
        if other.id != current {
            return PlacementOutcome::Occupied {
                by: other.id.clone(),
            };
        }
    }
    if !rooms.set_position(&current, position) {
        // Cursor points at a room that is gone; drop it.
        *cursor = None;
        return PlacementOutcome::NoCurrentRoom;
    }

    let next = rooms
        .next_after(&current)
        .map(|r| r.id.clone())
        .unwrap_or_else(|| current.clone());
    *cursor = Some(next.clone());
    PlacementOutcome::Placed {
        room: current,
        position,
        current: next,
    }
}

/// Point the cursor at `id`. Returns `false` (cursor untouched) if unknown.
pub fn select_room(rooms: &RoomRegistry, cursor: &mut Option<RoomId>, id: &RoomId) -> bool {
    match rooms.get(id) {
        Some(room) => {
            *cursor = Some(room.id.clone());
            true
        }
        None => false,
    }
}
