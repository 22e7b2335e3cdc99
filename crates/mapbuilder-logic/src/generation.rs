//! Generation call boundary.
//!
//! The wizard never talks to a backend directly: it hands out a
//! [`GenerationTicket`] and later accepts a completion for that ticket's
//! request id. Anything that can turn a [`GenerationRequest`] into an
//! [`ImageRef`] implements [`MapGenerator`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::details::ProjectDetails;
use crate::error::GenerationFailure;
use crate::plot::PlotSize;
use crate::rooms::Room;

/// Path served by the placeholder backend.
pub const PLACEHOLDER_IMAGE: &str = "/output.png";

/// Opaque locator for a generated image. The core never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic tag of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Body sent to the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub plot_size: PlotSize,
    pub number_of_rooms: usize,
    pub rooms: Vec<Room>,
    pub project_details: ProjectDetails,
}

impl GenerationRequest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Handed out by the wizard when a request is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTicket {
    pub request_id: RequestId,
    pub request: GenerationRequest,
}

/// Something that produces a floor-plan image for a request.
pub trait MapGenerator {
    fn generate(&mut self, request: &GenerationRequest) -> Result<ImageRef, GenerationFailure>;

    /// Simulated time this backend takes to answer. `None` uses the
    /// session's configured delay.
    fn latency_secs(&self) -> Option<f32> {
        None
    }
}

/// Backend stand-in that always answers with the same image.
#[derive(Debug, Clone)]
pub struct PlaceholderGenerator {
    image: ImageRef,
}

impl PlaceholderGenerator {
    pub fn new(image: ImageRef) -> Self {
        Self { image }
    }
}

impl Default for PlaceholderGenerator {
    fn default() -> Self {
        Self::new(ImageRef::new(PLACEHOLDER_IMAGE))
    }
}

impl MapGenerator for PlaceholderGenerator {
    fn generate(&mut self, request: &GenerationRequest) -> Result<ImageRef, GenerationFailure> {
        match request.to_json() {
            Ok(body) => log::debug!("Sending data to backend: {}", body),
            Err(e) => log::warn!("Could not serialize generation request: {}", e),
        }
        Ok(self.image.clone())
    }
}

/// Any closure over a request is a generator, which keeps test backends short.
impl<F> MapGenerator for F
where
    F: FnMut(&GenerationRequest) -> Result<ImageRef, GenerationFailure>,
{
    fn generate(&mut self, request: &GenerationRequest) -> Result<ImageRef, GenerationFailure> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::{Position, RoomRegistry, ROOM_NAMES};

    fn sample_request() -> GenerationRequest {
        let names: Vec<String> = ROOM_NAMES.iter().map(|s| s.to_string()).collect();
        let mut reg = RoomRegistry::seed(2, &names);
        let first = reg.as_slice()[0].id.clone();
        reg.set_position(&first, Position { x: 3, y: 4 });
        GenerationRequest {
            plot_size: PlotSize::default(),
            number_of_rooms: 2,
            rooms: reg.as_slice().to_vec(),
            project_details: ProjectDetails::default(),
        }
    }

    #[test]
    fn payload_is_camel_case() {
        let json: serde_json::Value =
            serde_json::from_str(&sample_request().to_json().unwrap()).unwrap();
        assert_eq!(json["plotSize"]["width"], 15);
        assert_eq!(json["numberOfRooms"], 2);
        assert_eq!(json["rooms"][0]["id"], "room-1");
        assert_eq!(json["rooms"][0]["position"]["x"], 3);
        assert!(json["rooms"][1]["position"].is_null());
        assert_eq!(json["projectDetails"]["style"], "modern");
    }

    #[test]
    fn placeholder_returns_fixed_path() {
        let mut backend = PlaceholderGenerator::default();
        let image = backend.generate(&sample_request()).unwrap();
        assert_eq!(image.as_str(), "/output.png");
    }

    #[test]
    fn closures_are_generators() {
        let mut calls = 0;
        let mut backend = |_: &GenerationRequest| -> Result<ImageRef, GenerationFailure> {
            calls += 1;
            Err(GenerationFailure::Backend("offline".into()))
        };
        assert!(backend.generate(&sample_request()).is_err());
        drop(backend);
        assert_eq!(calls, 1);
    }
}
