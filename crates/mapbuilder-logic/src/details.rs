//! Project preference form shown in the first wizard step.
//!
//! The values are descriptive only: they are forwarded untouched to the
//! generation backend and echoed in the design summary. Wire values match
//! the option values the backend expects (`"100000-200000"`, `"hot"`, ...).

use serde::{Deserialize, Serialize};

/// Budget bracket in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Budget {
    #[serde(rename = "under-100000")]
    Under100k,
    #[default]
    #[serde(rename = "100000-200000")]
    From100kTo200k,
    #[serde(rename = "200000-300000")]
    From200kTo300k,
    #[serde(rename = "300000-500000")]
    From300kTo500k,
    #[serde(rename = "over-500000")]
    Over500k,
}

impl Budget {
    pub const ALL: [Budget; 5] = [
        Budget::Under100k,
        Budget::From100kTo200k,
        Budget::From200kTo300k,
        Budget::From300kTo500k,
        Budget::Over500k,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Budget::Under100k => "Under $100,000",
            Budget::From100kTo200k => "$100,000 - $200,000",
            Budget::From200kTo300k => "$200,000 - $300,000",
            Budget::From300kTo500k => "$300,000 - $500,000",
            Budget::Over500k => "Over $500,000",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Modern,
    Traditional,
    Contemporary,
    Minimalist,
    Farmhouse,
    Mediterranean,
    Colonial,
    Craftsman,
}

impl Style {
    pub const ALL: [Style; 8] = [
        Style::Modern,
        Style::Traditional,
        Style::Contemporary,
        Style::Minimalist,
        Style::Farmhouse,
        Style::Mediterranean,
        Style::Colonial,
        Style::Craftsman,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Style::Modern => "Modern",
            Style::Traditional => "Traditional",
            Style::Contemporary => "Contemporary",
            Style::Minimalist => "Minimalist",
            Style::Farmhouse => "Farmhouse",
            Style::Mediterranean => "Mediterranean",
            Style::Colonial => "Colonial",
            Style::Craftsman => "Craftsman",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    #[default]
    Flat,
    Sloped,
    Hilly,
    Waterfront,
    Rocky,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Flat,
        Terrain::Sloped,
        Terrain::Hilly,
        Terrain::Waterfront,
        Terrain::Rocky,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Terrain::Flat => "Flat",
            Terrain::Sloped => "Sloped",
            Terrain::Hilly => "Hilly",
            Terrain::Waterfront => "Waterfront",
            Terrain::Rocky => "Rocky",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Climate {
    #[default]
    Temperate,
    Hot,
    Cold,
    Tropical,
    Coastal,
    Mountain,
}

impl Climate {
    pub const ALL: [Climate; 6] = [
        Climate::Temperate,
        Climate::Hot,
        Climate::Cold,
        Climate::Tropical,
        Climate::Coastal,
        Climate::Mountain,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Climate::Temperate => "Temperate",
            Climate::Hot => "Hot/Arid",
            Climate::Cold => "Cold",
            Climate::Tropical => "Tropical",
            Climate::Coastal => "Coastal",
            Climate::Mountain => "Mountain",
        }
    }
}

/// Floor count choices. The top choice means "4 or more".
pub const MIN_FLOORS: u8 = 1;
pub const MAX_FLOORS: u8 = 4;

/// Free-form preferences forwarded to the generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDetails {
    pub budget: Budget,
    pub style: Style,
    pub floors: u8,
    pub terrain: Terrain,
    pub climate: Climate,
    pub special_requirements: String,
}

impl Default for ProjectDetails {
    fn default() -> Self {
        Self {
            budget: Budget::default(),
            style: Style::default(),
            floors: MIN_FLOORS,
            terrain: Terrain::default(),
            climate: Climate::default(),
            special_requirements: String::new(),
        }
    }
}

/// A single field edit from the details form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DetailsUpdate {
    Budget(Budget),
    Style(Style),
    Floors(u8),
    Terrain(Terrain),
    Climate(Climate),
    SpecialRequirements(String),
}

impl ProjectDetails {
    /// Apply one field edit. Returns `false` if the value was ignored.
    pub fn apply(&mut self, update: DetailsUpdate) -> bool {
        match update {
            DetailsUpdate::Budget(b) => self.budget = b,
            DetailsUpdate::Style(s) => self.style = s,
            DetailsUpdate::Floors(n) => {
                if !(MIN_FLOORS..=MAX_FLOORS).contains(&n) {
                    return false;
                }
                self.floors = n;
            }
            DetailsUpdate::Terrain(t) => self.terrain = t,
            DetailsUpdate::Climate(c) => self.climate = c,
            DetailsUpdate::SpecialRequirements(text) => self.special_requirements = text,
        }
        true
    }

    pub fn floors_label(&self) -> String {
        match self.floors {
            1 => "1 Floor".to_string(),
            n if n >= MAX_FLOORS => format!("{}+ Floors", MAX_FLOORS),
            n => format!("{} Floors", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form() {
        let d = ProjectDetails::default();
        assert_eq!(d.budget, Budget::From100kTo200k);
        assert_eq!(d.style, Style::Modern);
        assert_eq!(d.floors, 1);
        assert_eq!(d.terrain, Terrain::Flat);
        assert_eq!(d.climate, Climate::Temperate);
        assert!(d.special_requirements.is_empty());
    }

    #[test]
    fn floors_out_of_range_ignored() {
        let mut d = ProjectDetails::default();
        assert!(!d.apply(DetailsUpdate::Floors(0)));
        assert!(!d.apply(DetailsUpdate::Floors(5)));
        assert_eq!(d.floors, 1);
        assert!(d.apply(DetailsUpdate::Floors(4)));
        assert_eq!(d.floors_label(), "4+ Floors");
    }

    #[test]
    fn wire_values() {
        let d = ProjectDetails::default();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["budget"], "100000-200000");
        assert_eq!(json["style"], "modern");
        assert_eq!(json["specialRequirements"], "");
    }

    #[test]
    fn update_from_json() {
        let update: DetailsUpdate =
            serde_json::from_str(r#"{"field":"climate","value":"hot"}"#).unwrap();
        let mut d = ProjectDetails::default();
        assert!(d.apply(update));
        assert_eq!(d.climate.label(), "Hot/Arid");
    }
}
