//! Plot dimensions and room-count bounds chosen in the setup step.
//!
//! All setters ignore out-of-range input and keep the previous value, the
//! way a bounded slider behaves. Nothing here ever errors.

use serde::{Deserialize, Serialize};

/// Smallest plot side the model accepts, in meters.
pub const MIN_PLOT_DIM: i32 = 1;
/// Largest plot side the model accepts, in meters.
pub const MAX_PLOT_DIM: i32 = 100;
/// Lower bound of the setup slider for plot sides.
pub const PLOT_SLIDER_MIN: i32 = 5;

/// Smallest room count the model accepts.
pub const MIN_ROOM_COUNT: i32 = 1;
/// Largest room count the model accepts.
pub const MAX_ROOM_COUNT: i32 = 10;
/// Lower bound of the setup slider for room count.
pub const ROOM_SLIDER_MIN: i32 = 3;

/// Which side of the plot a slider edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Width,
    Height,
}

/// Rectangular buildable area in whole meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotSize {
    fn default() -> Self {
        Self {
            width: 15,
            height: 12,
        }
    }
}

impl PlotSize {
    /// Build a plot, returning `None` if either side is out of range.
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if is_valid_dim(width) && is_valid_dim(height) {
            Some(Self {
                width: width as u32,
                height: height as u32,
            })
        } else {
            None
        }
    }

    /// Set one side. Returns `true` if the value was accepted.
    pub fn set(&mut self, dimension: Dimension, value: i32) -> bool {
        if !is_valid_dim(value) {
            return false;
        }
        match dimension {
            Dimension::Width => self.width = value as u32,
            Dimension::Height => self.height = value as u32,
        }
        true
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether `rooms` rooms can each get a cell of their own.
    pub fn fits(&self, rooms: usize) -> bool {
        self.cell_count() >= rooms
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    pub fn is_valid(&self) -> bool {
        is_valid_dim(self.width as i32) && is_valid_dim(self.height as i32)
    }
}

fn is_valid_dim(value: i32) -> bool {
    (MIN_PLOT_DIM..=MAX_PLOT_DIM).contains(&value)
}

/// Number of rooms to materialize when entering the design step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCount(u8);

impl Default for RoomCount {
    fn default() -> Self {
        Self(5)
    }
}

impl RoomCount {
    pub fn new(value: i32) -> Option<Self> {
        if (MIN_ROOM_COUNT..=MAX_ROOM_COUNT).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    /// Returns `true` if the value was accepted.
    pub fn set(&mut self, value: i32) -> bool {
        match Self::new(value) {
            Some(count) => {
                *self = count;
                true
            }
            None => false,
        }
    }

    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plot_is_15_by_12() {
        let plot = PlotSize::default();
        assert_eq!((plot.width, plot.height), (15, 12));
        assert_eq!(plot.area(), 180);
        assert!(plot.is_valid());
    }

    #[test]
    fn out_of_range_sides_are_ignored() {
        let mut plot = PlotSize::default();
        for bad in [0, -5, 150, 101] {
            assert!(!plot.set(Dimension::Width, bad));
            assert!(!plot.set(Dimension::Height, bad));
        }
        assert_eq!(plot, PlotSize::default());
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut plot = PlotSize::default();
        assert!(plot.set(Dimension::Width, 1));
        assert!(plot.set(Dimension::Height, 100));
        assert_eq!((plot.width, plot.height), (1, 100));
    }

    #[test]
    fn contains_is_half_open() {
        let plot = PlotSize::new(3, 2).unwrap();
        assert!(plot.contains(2, 1));
        assert!(!plot.contains(3, 0));
        assert!(!plot.contains(0, 2));
    }

    #[test]
    fn fits_needs_a_cell_per_room() {
        let plot = PlotSize::new(1, 2).unwrap();
        assert!(plot.fits(2));
        assert!(!plot.fits(5));
    }

    #[test]
    fn room_count_range() {
        let mut count = RoomCount::default();
        assert_eq!(count.get(), 5);
        assert!(!count.set(0));
        assert!(!count.set(11));
        assert_eq!(count.get(), 5);
        assert!(count.set(10));
        assert_eq!(count.get(), 10);
    }
}
