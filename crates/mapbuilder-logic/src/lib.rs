//! Pure wizard logic for MapBuilder.
//!
//! This crate contains the interactive core of the floor-plan wizard,
//! independent of any renderer, web framework, or backend. Functions take
//! plain data and return results, so the whole flow is unit-testable and
//! can sit behind a web front-end, a TUI, or the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Session defaults, room name table, generation timing |
//! | [`details`] | Project preference form (budget, style, floors, terrain, climate) |
//! | [`error`] | Validation, generation and misuse errors |
//! | [`generation`] | Backend boundary: request payload, tickets, `MapGenerator` |
//! | [`grid`] | Row-major cell matrix and per-room colors |
//! | [`placement`] | Grid click → room position, cursor advance |
//! | [`plot`] | Plot size and room count with range-checked setters |
//! | [`presentation`] | Progress, footer, legend, preview and summary view-models |
//! | [`rooms`] | Room records and the ordered registry |
//! | [`session`] | Simulated-clock driver with delay, timeout and stale drops |
//! | [`wizard`] | The four-step state machine |

pub mod config;
pub mod details;
pub mod error;
pub mod generation;
pub mod grid;
pub mod placement;
pub mod plot;
pub mod presentation;
pub mod rooms;
pub mod session;
pub mod wizard;
