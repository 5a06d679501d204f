//! Geographical locations of nodes in the supply chain.
use std::fmt;

/// A geographical location of a node
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// An optional label for the location (e.g. "Rotterdam")
    pub name: Option<String>,
}

impl Location {
    /// Create a new unlabelled location
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
        }
    }

    /// Create a new location with a label
    pub fn with_name(latitude: f64, longitude: f64, name: &str) -> Self {
        Self {
            latitude,
            longitude,
            name: Some(name.to_string()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("unnamed");
        write!(f, "{name} ({}, {})", self.latitude, self.longitude)
    }
}
