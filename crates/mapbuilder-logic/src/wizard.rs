//! The wizard state machine.
//!
//! [`Wizard`] owns the whole session as one [`WizardState`] aggregate and
//! exposes exactly one method per user action. Steps advance
//! `details → setup → design → result`; `setup` and `design` can step back
//! once, and [`Wizard::reset_design`] returns to a fresh session from
//! anywhere.
//!
//! Generation is split in two halves so the caller decides how the backend
//! runs: [`Wizard::generate_map`] validates and hands out a ticket, and
//! [`Wizard::complete_generation`] accepts the result for that ticket. A
//! result for any other request id is stale and dropped.
//!
//! ```
//! use mapbuilder_logic::generation::ImageRef;
//! use mapbuilder_logic::wizard::{Step, Wizard};
//!
//! let mut wizard = Wizard::default();
//! wizard.start_setup().unwrap();
//! wizard.set_room_count(3).unwrap();
//! wizard.start_design().unwrap();
//! for x in 0..3 {
//!     wizard.place_room(x, 0);
//! }
//! let ticket = wizard.generate_map().unwrap();
//! wizard.complete_generation(ticket.request_id, Ok(ImageRef::new("/output.png")));
//! assert_eq!(wizard.step(), Step::Result);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::WizardConfig;
use crate::details::{DetailsUpdate, ProjectDetails};
use crate::error::{GenerationFailure, ValidationError, WizardError};
use crate::generation::{GenerationRequest, GenerationTicket, ImageRef, RequestId};
use crate::grid::{build_grid, GridCell};
use crate::placement::{self, PlacementOutcome};
use crate::plot::{Dimension, PlotSize, RoomCount};
use crate::rooms::{Room, RoomId, RoomRegistry};

/// Wizard stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Details,
    Setup,
    Design,
    Result,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Details, Step::Setup, Step::Design, Step::Result];

    pub fn title(&self) -> &'static str {
        match self {
            Step::Details => "Project Details",
            Step::Setup => "Plot Setup",
            Step::Design => "Room Placement",
            Step::Result => "Final Design",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Step::Details => 0,
            Step::Setup => 1,
            Step::Design => 2,
            Step::Result => 3,
        }
    }

    /// Target of the back button, if the step has one.
    pub fn back(&self) -> Option<Step> {
        match self {
            Step::Setup => Some(Step::Details),
            Step::Design => Some(Step::Setup),
            Step::Details | Step::Result => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Details => "details",
            Step::Setup => "setup",
            Step::Design => "design",
            Step::Result => "result",
        };
        f.write_str(name)
    }
}

/// Everything the session knows. Only [`Wizard`] writes to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardState {
    pub step: Step,
    pub plot: PlotSize,
    pub room_count: RoomCount,
    pub details: ProjectDetails,
    pub rooms: RoomRegistry,
    /// Room receiving the next placement click.
    pub current_room: Option<RoomId>,
    pub generated_image: Option<ImageRef>,
    /// In-flight generation request; `Some` means loading.
    pub pending_request: Option<RequestId>,
    /// User-visible message from the last failed action.
    pub error: Option<String>,
}

impl WizardState {
    fn initial(config: &WizardConfig) -> Self {
        Self {
            step: Step::Details,
            plot: config.default_plot,
            room_count: config.default_room_count,
            details: config.default_details.clone(),
            rooms: RoomRegistry::default(),
            current_room: None,
            generated_image: None,
            pending_request: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_request.is_some()
    }

    pub fn current(&self) -> Option<&Room> {
        self.current_room.as_ref().and_then(|id| self.rooms.get(id))
    }
}

/// How a generation completion was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Succeeded(ImageRef),
    Failed(GenerationFailure),
    /// The request is no longer the one in flight.
    Stale,
}

/// A user action, for drivers that replay scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardAction {
    UpdateDetails { update: DetailsUpdate },
    SetPlotSize { dimension: Dimension, value: i32 },
    SetRoomCount { value: i32 },
    StartSetup,
    StartDesign,
    PlaceRoom { x: u32, y: u32 },
    SelectRoom { id: RoomId },
    GenerateMap,
    GoBack,
    ResetDesign,
}

/// Result of [`Wizard::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Applied,
    /// Input was out of range or referred to nothing; state is unchanged.
    Ignored,
    Placement(PlacementOutcome),
    Requested(GenerationTicket),
}

impl ActionOutcome {
    fn from_accepted(accepted: bool) -> Self {
        if accepted {
            ActionOutcome::Applied
        } else {
            ActionOutcome::Ignored
        }
    }
}

/// The wizard state machine.
#[derive(Debug, Clone)]
pub struct Wizard {
    config: WizardConfig,
    state: WizardState,
    /// Survives resets so stale completions can never match a new request.
    next_request: u64,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(WizardConfig::default())
    }
}

impl Wizard {
    pub fn new(config: WizardConfig) -> Self {
        let state = WizardState::initial(&config);
        Self {
            config,
            state,
            next_request: 1,
        }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn plot(&self) -> PlotSize {
        self.state.plot
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.state.rooms
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.state.current()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn generated_image(&self) -> Option<&ImageRef> {
        self.state.generated_image.as_ref()
    }

    /// Cells for the placement grid, reflecting the current registry.
    pub fn grid(&self) -> Vec<GridCell<'_>> {
        build_grid(
            self.state.plot,
            self.state.rooms.as_slice(),
            self.state.current_room.as_ref(),
        )
    }

    fn require_step(&self, action: &'static str, step: Step) -> Result<(), WizardError> {
        if self.state.step == step {
            Ok(())
        } else {
            log::warn!("Rejected '{}' in step '{}'", action, self.state.step);
            Err(WizardError::InvalidStep {
                action,
                step: self.state.step,
            })
        }
    }

    // ── details ─────────────────────────────────────────────────────────

    /// Edit one preference field. `Ok(false)` means the value was ignored.
    pub fn update_details(&mut self, update: DetailsUpdate) -> Result<bool, WizardError> {
        self.require_step("update_details", Step::Details)?;
        Ok(self.state.details.apply(update))
    }

    pub fn start_setup(&mut self) -> Result<(), WizardError> {
        self.require_step("start_setup", Step::Details)?;
        self.state.step = Step::Setup;
        log::info!("Entered setup step");
        Ok(())
    }

    // ── setup ───────────────────────────────────────────────────────────

    /// Slider input for one plot side. Out-of-range values are ignored.
    pub fn set_plot_dimension(
        &mut self,
        dimension: Dimension,
        value: i32,
    ) -> Result<bool, WizardError> {
        self.require_step("set_plot_dimension", Step::Setup)?;
        let accepted = self.state.plot.set(dimension, value);
        if !accepted {
            log::debug!("Ignored plot {:?} = {}", dimension, value);
        }
        Ok(accepted)
    }

    /// Slider input for room count. Out-of-range values are ignored.
    pub fn set_room_count(&mut self, value: i32) -> Result<bool, WizardError> {
        self.require_step("set_room_count", Step::Setup)?;
        let accepted = self.state.room_count.set(value);
        if !accepted {
            log::debug!("Ignored room count {}", value);
        }
        Ok(accepted)
    }

    /// Materialize the rooms and move to placement.
    ///
    /// Refused with [`WizardError::PlotTooSmall`] when the plot has fewer
    /// cells than rooms; the wizard stays in `setup`.
    pub fn start_design(&mut self) -> Result<(), WizardError> {
        self.require_step("start_design", Step::Setup)?;
        let count = self.state.room_count.get();
        if !self.state.plot.fits(count) {
            let cells = self.state.plot.cell_count();
            log::warn!("Refused design: {} rooms on {} cells", count, cells);
            return Err(WizardError::PlotTooSmall {
                cells,
                rooms: count,
            });
        }
        let rooms = RoomRegistry::seed(count, &self.config.room_names);
        self.state.current_room = rooms.first().map(|r| r.id.clone());
        self.state.rooms = rooms;
        self.state.error = None;
        self.state.step = Step::Design;
        log::info!(
            "Entered design step: {} rooms on a {}x{} plot",
            self.state.rooms.len(),
            self.state.plot.width,
            self.state.plot.height
        );
        Ok(())
    }

    // ── design ──────────────────────────────────────────────────────────

    /// Grid click. Never errors; the outcome says what happened.
    pub fn place_room(&mut self, x: u32, y: u32) -> PlacementOutcome {
        if self.state.step != Step::Design {
            log::debug!("Ignored grid click in step '{}'", self.state.step);
            return PlacementOutcome::WrongStep {
                step: self.state.step,
            };
        }
        if self.state.is_loading() {
            return PlacementOutcome::Busy;
        }
        let outcome = placement::place_room(
            &mut self.state.rooms,
            &mut self.state.current_room,
            self.state.plot,
            x,
            y,
        );
        if let PlacementOutcome::Placed { room, position, .. } = &outcome {
            log::debug!("Placed {} at {}", room, position);
        }
        outcome
    }

    /// Tab click. Returns `false` outside `design` or if no room has this id.
    pub fn select_room(&mut self, id: &RoomId) -> bool {
        if self.state.step != Step::Design {
            return false;
        }
        placement::select_room(&self.state.rooms, &mut self.state.current_room, id)
    }

    /// Validate placements and issue a generation request.
    ///
    /// On success the wizard is loading until [`Wizard::complete_generation`]
    /// receives the ticket's id. On a validation failure the message is also
    /// stored in [`WizardState::error`] and the step does not change.
    pub fn generate_map(&mut self) -> Result<GenerationTicket, WizardError> {
        self.require_step("generate_map", Step::Design)?;
        if self.state.is_loading() {
            return Err(WizardError::Busy);
        }
        self.state.error = None;

        let missing: Vec<String> = self
            .state
            .rooms
            .unplaced()
            .map(|r| r.name.clone())
            .collect();
        if !missing.is_empty() {
            let err = ValidationError { missing };
            self.state.error = Some(err.to_string());
            log::info!("Generation refused: {}", err);
            return Err(err.into());
        }

        let request_id = RequestId(self.next_request);
        self.next_request += 1;
        self.state.pending_request = Some(request_id);

        let request = GenerationRequest {
            plot_size: self.state.plot,
            number_of_rooms: self.state.room_count.get(),
            rooms: self.state.rooms.as_slice().to_vec(),
            project_details: self.state.details.clone(),
        };
        log::info!(
            "Generation request {} issued for {} rooms",
            request_id,
            request.rooms.len()
        );
        Ok(GenerationTicket {
            request_id,
            request,
        })
    }

    /// Deliver the backend's answer for `request_id`.
    pub fn complete_generation(
        &mut self,
        request_id: RequestId,
        result: Result<ImageRef, GenerationFailure>,
    ) -> Completion {
        if self.state.pending_request != Some(request_id) || self.state.step != Step::Design {
            log::debug!("Discarding stale generation result {}", request_id);
            return Completion::Stale;
        }
        self.state.pending_request = None;

        match result {
            Ok(image) => {
                log::info!("Generation {} finished: {}", request_id, image);
                self.state.generated_image = Some(image.clone());
                self.state.step = Step::Result;
                Completion::Succeeded(image)
            }
            Err(failure) => {
                log::warn!("Generation {} failed: {}", request_id, failure);
                self.state.error = Some(failure.to_string());
                Completion::Failed(failure)
            }
        }
    }

    // ── navigation ──────────────────────────────────────────────────────

    /// Step back once from `setup` or `design`.
    ///
    /// Leaving `design` discards the rooms and abandons any in-flight
    /// request; the rooms are rebuilt on the next [`Wizard::start_design`].
    pub fn go_back(&mut self) -> Result<Step, WizardError> {
        let Some(target) = self.state.step.back() else {
            log::warn!("Rejected 'go_back' in step '{}'", self.state.step);
            return Err(WizardError::InvalidStep {
                action: "go_back",
                step: self.state.step,
            });
        };
        if self.state.step == Step::Design {
            if let Some(id) = self.state.pending_request.take() {
                log::info!("Abandoned generation request {}", id);
            }
            self.state.rooms.clear();
            self.state.current_room = None;
            self.state.error = None;
        }
        self.state.step = target;
        log::info!("Went back to {} step", target);
        Ok(target)
    }

    /// Start over from a fresh session, whatever the current step.
    pub fn reset_design(&mut self) {
        if let Some(id) = self.state.pending_request {
            log::info!("Abandoned generation request {}", id);
        }
        self.state = WizardState::initial(&self.config);
        log::info!("Design reset");
    }

    /// Dispatch a scripted action to its entry point.
    pub fn apply(&mut self, action: WizardAction) -> Result<ActionOutcome, WizardError> {
        let outcome = match action {
            WizardAction::UpdateDetails { update } => {
                ActionOutcome::from_accepted(self.update_details(update)?)
            }
            WizardAction::SetPlotSize { dimension, value } => {
                ActionOutcome::from_accepted(self.set_plot_dimension(dimension, value)?)
            }
            WizardAction::SetRoomCount { value } => {
                ActionOutcome::from_accepted(self.set_room_count(value)?)
            }
            WizardAction::StartSetup => {
                self.start_setup()?;
                ActionOutcome::Applied
            }
            WizardAction::StartDesign => {
                self.start_design()?;
                ActionOutcome::Applied
            }
            WizardAction::PlaceRoom { x, y } => ActionOutcome::Placement(self.place_room(x, y)),
            WizardAction::SelectRoom { id } => ActionOutcome::from_accepted(self.select_room(&id)),
            WizardAction::GenerateMap => ActionOutcome::Requested(self.generate_map()?),
            WizardAction::GoBack => {
                self.go_back()?;
                ActionOutcome::Applied
            }
            WizardAction::ResetDesign => {
                self.reset_design();
                ActionOutcome::Applied
            }
        };
        Ok(outcome)
    }
}
