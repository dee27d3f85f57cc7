// src/models/location.rs

use serde::{Deserialize, Serialize};

/// How the viewer's coordinate was acquired.
///
/// `None` means the viewer shared no location: the feed then skips the radius
/// filter and annotates every post with distance 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationMethod {
    /// Satellite positioning (device GPS).
    Gps,
    /// Resolved from a postal code.
    Postal,
    #[default]
    None,
}

impl LocationMethod {
    /// Whether this method carries a usable coordinate.
    pub fn has_coordinates(self) -> bool {
        !matches!(self, LocationMethod::None)
    }
}

/// The viewer's position for a single feed query. Never persisted; the core
/// is stateless between calls and receives this explicitly per request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewerLocation {
    pub lat: f64,
    pub lng: f64,
    pub method: LocationMethod,
}

/// A postal code resolved to its approximate center and area label.
#[derive(Debug, Clone, Serialize)]
pub struct PostalArea {
    pub postal_code: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub area: &'static str,
}

/// Central Madrid postal codes supported by the postal-code location method.
const POSTAL_AREAS: [(&str, f64, f64, &str); 10] = [
    ("28001", 40.4168, -3.7038, "Centro - Sol"),
    ("28002", 40.4095, -3.6934, "Centro - Cortes"),
    ("28003", 40.4021, -3.6987, "Centro - Embajadores"),
    ("28004", 40.42, -3.698, "Centro - Justicia"),
    ("28005", 40.4089, -3.6801, "Centro - Inclán"),
    ("28006", 40.424, -3.689, "Centro - Universidad"),
    ("28007", 40.4315, -3.692, "Centro - Palacio"),
    ("28008", 40.438, -3.685, "Chamberí"),
    ("28009", 40.428, -3.71, "Moncloa"),
    ("28010", 40.415, -3.72, "Arganzuela"),
];

/// Resolve a postal code to a coordinate and area label.
pub fn lookup_postal_code(code: &str) -> Option<PostalArea> {
    POSTAL_AREAS
        .iter()
        .find(|(postal_code, _, _, _)| *postal_code == code)
        .map(|&(postal_code, lat, lng, area)| PostalArea {
            postal_code,
            lat,
            lng,
            area,
        })
}
