//! Error types surfaced by the wizard.

use serde::{Deserialize, Serialize};

use crate::wizard::Step;

/// Rooms were still unplaced when generation was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Names of the unplaced rooms, in registry order.
    pub missing: Vec<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Please position all rooms before generating the map. Missing: {}",
            self.missing.join(", ")
        )
    }
}

impl std::error::Error for ValidationError {}

/// The generation backend failed or never answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationFailure {
    /// Backend reported an error. An empty message gets the generic text.
    Backend(String),
    TimedOut { after_secs: f32 },
}

impl std::fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationFailure::Backend(msg) if !msg.trim().is_empty() => f.write_str(msg),
            GenerationFailure::Backend(_) => {
                f.write_str("Failed to generate map. Please try again.")
            }
            GenerationFailure::TimedOut { after_secs } => write!(
                f,
                "Map generation timed out after {:.0} seconds. Please try again.",
                after_secs
            ),
        }
    }
}

impl std::error::Error for GenerationFailure {}

/// Errors returned by wizard actions.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardError {
    Validation(ValidationError),
    Generation(GenerationFailure),
    /// A generation request is already in flight.
    Busy,
    /// The action is not available in the current step.
    InvalidStep { action: &'static str, step: Step },
    /// The plot has fewer cells than rooms, so placement could never finish.
    PlotTooSmall { cells: usize, rooms: usize },
}

impl From<ValidationError> for WizardError {
    fn from(e: ValidationError) -> Self {
        WizardError::Validation(e)
    }
}

impl From<GenerationFailure> for WizardError {
    fn from(e: GenerationFailure) -> Self {
        WizardError::Generation(e)
    }
}

impl std::fmt::Display for WizardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardError::Validation(e) => write!(f, "{}", e),
            WizardError::Generation(e) => write!(f, "{}", e),
            WizardError::Busy => write!(f, "A floor plan is already being generated"),
            WizardError::InvalidStep { action, step } => {
                write!(f, "Action '{}' is not available in step '{}'", action, step)
            }
            WizardError::PlotTooSmall { cells, rooms } => write!(
                f,
                "The plot has {} cells but {} rooms need a cell each. Enlarge the plot or remove rooms.",
                cells, rooms
            ),
        }
    }
}

impl std::error::Error for WizardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WizardError::Validation(e) => Some(e),
            WizardError::Generation(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_names() {
        let e = ValidationError {
            missing: vec!["Kitchen".into(), "Study".into()],
        };
        assert_eq!(
            e.to_string(),
            "Please position all rooms before generating the map. Missing: Kitchen, Study"
        );
    }

    #[test]
    fn empty_backend_message_gets_generic_text() {
        let e = GenerationFailure::Backend(String::new());
        assert_eq!(e.to_string(), "Failed to generate map. Please try again.");
        let e = GenerationFailure::Backend("quota exceeded".into());
        assert_eq!(e.to_string(), "quota exceeded");
    }

    #[test]
    fn wizard_error_wraps_source() {
        use std::error::Error;
        let e: WizardError = GenerationFailure::TimedOut { after_secs: 30.0 }.into();
        assert!(e.source().is_some());
        assert!(e.to_string().contains("30 seconds"));
        assert!(WizardError::Busy.source().is_none());
    }

    #[test]
    fn plot_too_small_message() {
        let e = WizardError::PlotTooSmall { cells: 2, rooms: 5 };
        assert_eq!(
            e.to_string(),
            "The plot has 2 cells but 5 rooms need a cell each. Enlarge the plot or remove rooms."
        );
    }
}
