//! Room records and the ordered registry the design step works on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default room names, in the order rooms are materialized.
pub const ROOM_NAMES: [&str; 10] = [
    "Living Room",
    "Kitchen",
    "Master Bedroom",
    "Bathroom",
    "Dining Room",
    "Guest Bedroom",
    "Study",
    "Laundry Room",
    "Garage",
    "Patio",
];

/// Stable room identifier of the form `room-N` (N is 1-based).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn numbered(n: usize) -> Self {
        Self(format!("room-{}", n))
    }

    /// Numeric suffix after the last `-`, if any.
    pub fn ordinal(&self) -> Option<u32> {
        self.0.rsplit('-').next()?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A grid cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub position: Option<Position>,
}

impl Room {
    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// First character of the name, used as the grid marker.
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

/// Display name for the room at 0-based `index`.
pub fn room_name(names: &[String], index: usize) -> String {
    match names.get(index) {
        Some(name) => name.clone(),
        None => format!("Room {}", index + 1),
    }
}

/// Ordered room list. Membership is fixed once seeded; only positions change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomRegistry {
    rooms: Vec<Room>,
}

impl RoomRegistry {
    /// Materialize `count` unplaced rooms named from `names`.
    pub fn seed(count: usize, names: &[String]) -> Self {
        let rooms = (0..count)
            .map(|i| Room {
                id: RoomId::numbered(i + 1),
                name: room_name(names, i),
                position: None,
            })
            .collect();
        Self { rooms }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn as_slice(&self) -> &[Room] {
        &self.rooms
    }

    pub fn first(&self) -> Option<&Room> {
        self.rooms.first()
    }

    pub fn get(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn index_of(&self, id: &RoomId) -> Option<usize> {
        self.rooms.iter().position(|r| &r.id == id)
    }

    /// The room following `id` in registry order.
    pub fn next_after(&self, id: &RoomId) -> Option<&Room> {
        let idx = self.index_of(id)?;
        self.rooms.get(idx + 1)
    }

    /// Room currently holding the cell `pos`, if any.
    pub fn occupant_at(&self, pos: Position) -> Option<&Room> {
        self.rooms.iter().find(|r| r.position == Some(pos))
    }

    /// Returns `false` if no room has this id.
    pub fn set_position(&mut self, id: &RoomId, pos: Position) -> bool {
        match self.rooms.iter_mut().find(|r| &r.id == id) {
            Some(room) => {
                room.position = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn unplaced(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| !r.is_placed())
    }

    pub fn placed_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.is_placed()).count()
    }

    pub fn all_placed(&self) -> bool {
        self.rooms.iter().all(Room::is_placed)
    }

    pub fn clear(&mut self) {
        self.rooms.clear();
    }
}
