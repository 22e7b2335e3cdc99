//! Grid model: the renderable cell matrix for the placement step.
//!
//! Cells are derived fresh from the plot and registry on every call; there
//! is no cached state. Room lookup goes through a position map so a full
//! 100×100 plot costs one pass over the cells plus one over the rooms.

use std::collections::HashMap;

use serde::Serialize;

use crate::plot::PlotSize;
use crate::rooms::{Position, Room, RoomId};

/// Fixed marker palette, indexed by room ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
    Indigo,
    Orange,
    Teal,
    Cyan,
}

pub const PALETTE: [RoomColor; 10] = [
    RoomColor::Red,
    RoomColor::Blue,
    RoomColor::Green,
    RoomColor::Yellow,
    RoomColor::Purple,
    RoomColor::Pink,
    RoomColor::Indigo,
    RoomColor::Orange,
    RoomColor::Teal,
    RoomColor::Cyan,
];

impl RoomColor {
    /// Yellow markers carry dark text; every other color carries light text.
    pub fn dark_text(&self) -> bool {
        matches!(self, RoomColor::Yellow)
    }
}

/// Stable color for a room, derived from the numeric suffix of its id.
pub fn color_for_room(id: &RoomId) -> RoomColor {
    let idx = id
        .ordinal()
        .map(|n| (n.saturating_sub(1) as usize) % PALETTE.len())
        .unwrap_or(0);
    PALETTE[idx]
}

/// One cell of the plot grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell<'a> {
    pub x: u32,
    pub y: u32,
    pub room: Option<&'a Room>,
    /// The occupying room is the current room.
    pub is_current: bool,
}

impl GridCell<'_> {
    /// Tooltip text for the cell.
    pub fn title(&self) -> String {
        match self.room {
            Some(room) => format!("Cell ({}, {}) - {}", self.x, self.y, room.name),
            None => format!("Cell ({}, {})", self.x, self.y),
        }
    }
}

/// Build the `width × height` cells in row-major order.
pub fn build_grid<'a>(
    plot: PlotSize,
    rooms: &'a [Room],
    current: Option<&RoomId>,
) -> Vec<GridCell<'a>> {
    let mut by_pos: HashMap<Position, &Room> = HashMap::with_capacity(rooms.len());
    for room in rooms {
        if let Some(pos) = room.position {
            // First room wins if positions ever collide.
            by_pos.entry(pos).or_insert(room);
        }
    }

    let mut cells = Vec::with_capacity(plot.cell_count());
    for y in 0..plot.height {
        for x in 0..plot.width {
            let room = by_pos.get(&Position { x, y }).copied();
            let is_current = match (room, current) {
                (Some(r), Some(c)) => &r.id == c,
                _ => false,
            };
            cells.push(GridCell {
                x,
                y,
                room,
                is_current,
            });
        }
    }
    cells
}

/// ASCII dump of the grid: room initial per occupied cell, `.` otherwise.
/// The current room is shown in lowercase.
pub fn render_ascii(plot: PlotSize, rooms: &[Room], current: Option<&RoomId>) -> String {
    let cells = build_grid(plot, rooms, current);
    let mut out = String::with_capacity(cells.len() + plot.height as usize);
    for row in cells.chunks(plot.width as usize) {
        for cell in row {
            let ch = match cell.room {
                Some(room) if cell.is_current => room.initial().to_ascii_lowercase(),
                Some(room) => room.initial(),
                None => '.',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::{RoomRegistry, ROOM_NAMES};

    fn registry(n: usize) -> RoomRegistry {
        let names: Vec<String> = ROOM_NAMES.iter().map(|s| s.to_string()).collect();
        RoomRegistry::seed(n, &names)
    }

    #[test]
    fn grid_is_row_major() {
        let plot = PlotSize::new(3, 2).unwrap();
        let cells = build_grid(plot, &[], None);
        let coords: Vec<(u32, u32)> = cells.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn cells_carry_their_room() {
        let plot = PlotSize::new(4, 4).unwrap();
        let mut reg = registry(2);
        reg.set_position(&RoomId::numbered(1), Position { x: 2, y: 1 });
        let current = RoomId::numbered(1);
        let cells = build_grid(plot, reg.as_slice(), Some(&current));

        let cell = &cells[4 + 2];
        assert_eq!(cell.room.map(|r| r.name.as_str()), Some("Living Room"));
        assert!(cell.is_current);
        assert_eq!(cell.title(), "Cell (2, 1) - Living Room");
        assert_eq!(cells.iter().filter(|c| c.room.is_some()).count(), 1);
    }

    #[test]
    fn full_size_grid() {
        let plot = PlotSize::new(100, 100).unwrap();
        let cells = build_grid(plot, &[], None);
        assert_eq!(cells.len(), 10_000);
    }

    #[test]
    fn colors_cycle_by_ordinal() {
        assert_eq!(color_for_room(&RoomId::numbered(1)), RoomColor::Red);
        assert_eq!(color_for_room(&RoomId::numbered(4)), RoomColor::Yellow);
        assert!(color_for_room(&RoomId::numbered(4)).dark_text());
        assert_eq!(color_for_room(&RoomId::numbered(11)), RoomColor::Red);
        assert_eq!(color_for_room(&RoomId::from("lobby")), RoomColor::Red);
    }

    #[test]
    fn ascii_dump_marks_rooms() {
        let plot = PlotSize::new(3, 2).unwrap();
        let mut reg = registry(2);
        reg.set_position(&RoomId::numbered(1), Position { x: 0, y: 0 });
        reg.set_position(&RoomId::numbered(2), Position { x: 2, y: 1 });
        let current = RoomId::numbered(2);
        let dump = render_ascii(plot, reg.as_slice(), Some(&current));
        assert_eq!(dump, "L..\n..k\n");
    }
}
