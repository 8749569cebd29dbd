use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic point, WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}, {:.2}", self.lat, self.lon)
    }
}

/// Current conditions for a resolved city. Produced once per search cycle
/// and replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Canonical city name as resolved by the weather service.
    pub city: String,
    pub temperature_c: f64,
    pub condition: String,
    pub coord: Coordinates,
    pub observation_time: DateTime<Utc>,
}

/// A nearby point of interest returned by the places service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOfInterest {
    pub id: String,
    pub name: String,
    pub coord: Coordinates,
    pub rating: Option<f64>,
    pub vicinity: String,
}

impl PlaceOfInterest {
    /// Rating text for display. Places without a rating get a placeholder
    /// label rather than being hidden.
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) => format!("{rating:.1} ★"),
            None => "No rating".to_string(),
        }
    }
}
