//! View-model derivations for whatever renders the wizard.
//!
//! Nothing here mutates state. Each function reads the wizard and returns
//! plain serializable data (labels, flags, percentages) so a front-end only
//! has to lay it out.

use serde::Serialize;

use crate::grid::{color_for_room, RoomColor};
use crate::rooms::Room;
use crate::wizard::{Step, Wizard};

/// Where a stage sits relative to the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Complete,
    Active,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStage {
    pub number: usize,
    pub title: &'static str,
    pub status: StageStatus,
}

/// The four-stage progress indicator.
pub fn progress(current: Step) -> Vec<ProgressStage> {
    Step::ALL
        .iter()
        .map(|step| {
            let status = if *step == current {
                StageStatus::Active
            } else if step.index() < current.index() {
                StageStatus::Complete
            } else {
                StageStatus::Upcoming
            };
            ProgressStage {
                number: step.index() + 1,
                title: step.title(),
                status,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryAction {
    Continue,
    StartPlacing,
    Generate,
    StartNewDesign,
}

impl PrimaryAction {
    pub fn label(&self, loading: bool) -> &'static str {
        match self {
            PrimaryAction::Continue => "Continue",
            PrimaryAction::StartPlacing => "Start Placing Rooms",
            PrimaryAction::Generate if loading => "Generating...",
            PrimaryAction::Generate => "Generate Floor Plan",
            PrimaryAction::StartNewDesign => "Start New Design",
        }
    }
}

/// Footer buttons for the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterControls {
    pub show_back: bool,
    pub primary: PrimaryAction,
    pub primary_label: &'static str,
    pub primary_enabled: bool,
}

pub fn footer_controls(wizard: &Wizard) -> FooterControls {
    let step = wizard.step();
    let loading = wizard.is_loading();
    let primary = match step {
        Step::Details => PrimaryAction::Continue,
        Step::Setup => PrimaryAction::StartPlacing,
        Step::Design => PrimaryAction::Generate,
        Step::Result => PrimaryAction::StartNewDesign,
    };
    let primary_enabled = match primary {
        PrimaryAction::StartPlacing => {
            let state = wizard.state();
            state.plot.fits(state.room_count.get())
        }
        PrimaryAction::Generate => !loading && wizard.rooms().all_placed(),
        _ => true,
    };
    FooterControls {
        show_back: step.back().is_some(),
        primary,
        primary_label: primary.label(loading),
        primary_enabled,
    }
}

/// Instruction shown under a room's tab.
pub fn room_hint(room: &Room) -> String {
    match room.position {
        Some(pos) => format!(
            "{} positioned at coordinates ({}, {}). Click elsewhere to reposition.",
            room.name, pos.x, pos.y
        ),
        None => format!("Click on the grid to position {}.", room.name),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub id: String,
    pub name: String,
    pub initial: char,
    pub color: RoomColor,
    pub is_current: bool,
    pub placed: bool,
    /// `(x,y)` once placed.
    pub position_label: Option<String>,
}

/// Legend rows under the grid, one per room in registry order.
pub fn legend(wizard: &Wizard) -> Vec<LegendEntry> {
    let current = wizard.state().current_room.as_ref();
    wizard
        .rooms()
        .iter()
        .map(|room| LegendEntry {
            id: room.id.to_string(),
            name: room.name.clone(),
            initial: room.initial(),
            color: color_for_room(&room.id),
            is_current: Some(&room.id) == current,
            placed: room.is_placed(),
            position_label: room.position.map(|p| format!("({},{})", p.x, p.y)),
        })
        .collect()
}

/// Scaled outline of the plot in the setup step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPreview {
    pub width_label: String,
    pub height_label: String,
    /// Outline size as a percentage of the preview box.
    pub width_percent: f32,
    pub height_percent: f32,
    pub area_m2: u32,
    pub rooms_to_place: usize,
}

fn preview_percent(meters: u32) -> f32 {
    (meters as f32 / 100.0 * 90.0).min(90.0)
}

pub fn plot_preview(wizard: &Wizard) -> PlotPreview {
    let plot = wizard.plot();
    PlotPreview {
        width_label: format!("{}m", plot.width),
        height_label: format!("{}m", plot.height),
        width_percent: preview_percent(plot.width),
        height_percent: preview_percent(plot.height),
        area_m2: plot.area(),
        rooms_to_place: wizard.state().room_count.get(),
    }
}

/// Recap shown next to the generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignSummary {
    pub width: u32,
    pub height: u32,
    pub area_m2: u32,
    pub style: &'static str,
    pub room_count: usize,
    pub floors: u8,
    pub image: Option<String>,
}

impl DesignSummary {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!(
                "Plot size: {}m × {}m ({}m²)",
                self.width, self.height, self.area_m2
            ),
            format!("Architectural style: {}", self.style),
            format!("Number of rooms: {}", self.room_count),
            format!("Number of floors: {}", self.floors),
        ]
    }
}

/// Summary of the finished design; `None` before the result step.
pub fn design_summary(wizard: &Wizard) -> Option<DesignSummary> {
    if wizard.step() != Step::Result {
        return None;
    }
    let state = wizard.state();
    Some(DesignSummary {
        width: state.plot.width,
        height: state.plot.height,
        area_m2: state.plot.area(),
        style: state.details.style.label(),
        room_count: state.rooms.len(),
        floors: state.details.floors,
        image: state.generated_image.as_ref().map(|i| i.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ImageRef;

    fn placed_wizard() -> Wizard {
        let mut w = Wizard::default();
        w.start_setup().unwrap();
        w.set_room_count(3).unwrap();
        w.start_design().unwrap();
        w
    }

    #[test]
    fn progress_marks_past_and_active() {
        let stages = progress(Step::Design);
        let statuses: Vec<StageStatus> = stages.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            [
                StageStatus::Complete,
                StageStatus::Complete,
                StageStatus::Active,
                StageStatus::Upcoming
            ]
        );
        assert_eq!(stages[2].title, "Room Placement");
        assert_eq!(stages[3].number, 4);
    }

    #[test]
    fn generate_button_needs_all_rooms() {
        let mut w = placed_wizard();
        let footer = footer_controls(&w);
        assert!(footer.show_back);
        assert_eq!(footer.primary, PrimaryAction::Generate);
        assert!(!footer.primary_enabled);

        for x in 0..3 {
            w.place_room(x, 0);
        }
        assert!(footer_controls(&w).primary_enabled);

        w.generate_map().unwrap();
        let footer = footer_controls(&w);
        assert!(!footer.primary_enabled);
        assert_eq!(footer.primary_label, "Generating...");
    }

    #[test]
    fn start_placing_needs_room_for_every_room() {
        let mut w = Wizard::default();
        w.start_setup().unwrap();
        assert!(footer_controls(&w).primary_enabled);
        w.set_plot_dimension(crate::plot::Dimension::Width, 1)
            .unwrap();
        w.set_plot_dimension(crate::plot::Dimension::Height, 3)
            .unwrap();
        let footer = footer_controls(&w);
        assert_eq!(footer.primary, PrimaryAction::StartPlacing);
        assert!(!footer.primary_enabled);
    }

    #[test]
    fn details_step_has_no_back() {
        let footer = footer_controls(&Wizard::default());
        assert!(!footer.show_back);
        assert_eq!(footer.primary_label, "Continue");
    }

    #[test]
    fn hints_follow_placement() {
        let mut w = placed_wizard();
        assert_eq!(
            room_hint(&w.rooms().as_slice()[0]),
            "Click on the grid to position Living Room."
        );
        w.place_room(4, 2);
        assert_eq!(
            room_hint(&w.rooms().as_slice()[0]),
            "Living Room positioned at coordinates (4, 2). Click elsewhere to reposition."
        );
    }

    #[test]
    fn legend_tracks_cursor() {
        let mut w = placed_wizard();
        w.place_room(0, 0);
        let rows = legend(&w);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].position_label.as_deref(), Some("(0,0)"));
        assert!(!rows[0].is_current);
        assert!(rows[1].is_current);
        assert_eq!(rows[1].initial, 'K');
        assert_eq!(rows[1].color, RoomColor::Blue);
    }

    #[test]
    fn preview_caps_at_ninety_percent() {
        let mut w = Wizard::default();
        let p = plot_preview(&w);
        assert_eq!(p.area_m2, 180);
        assert!((p.width_percent - 13.5).abs() < 1e-4);
        w.start_setup().unwrap();
        w.set_plot_dimension(crate::plot::Dimension::Width, 100)
            .unwrap();
        assert!((plot_preview(&w).width_percent - 90.0).abs() < 1e-4);
        assert_eq!(plot_preview(&w).width_label, "100m");
    }

    #[test]
    fn summary_only_in_result() {
        let mut w = placed_wizard();
        assert!(design_summary(&w).is_none());
        for x in 0..3 {
            w.place_room(x, 0);
        }
        let t = w.generate_map().unwrap();
        w.complete_generation(t.request_id, Ok(ImageRef::new("/output.png")));
        let summary = design_summary(&w).unwrap();
        assert_eq!(summary.style, "Modern");
        assert_eq!(summary.room_count, 3);
        assert_eq!(summary.lines()[0], "Plot size: 15m × 12m (180m²)");
        assert_eq!(summary.image.as_deref(), Some("/output.png"));
    }
}
