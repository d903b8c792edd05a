use serde::{Deserialize, Serialize};

/// Latitude span of the initial camera region around a device position
pub const REGION_LATITUDE_DELTA: f64 = 0.0922;
/// Longitude span of the initial camera region around a device position
pub const REGION_LONGITUDE_DELTA: f64 = 0.0421;

/// A geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Whether both components are finite and within the valid degree ranges.
    ///
    /// Markers with coordinates failing this check are rejected at the store
    /// boundary; the filter core never sees them.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A user-created point of interest on the map
///
/// Identity is `id`, the unix-millisecond creation timestamp; the store
/// guarantees uniqueness within a device's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: i64,
    pub coordinate: Coordinate,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub favorite: bool,
}

/// Filter settings for computing the display set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(rename = "favoritesOnly")]
    pub favorites_only: bool,
    /// Radius in meters; 0 disables radius filtering
    #[serde(rename = "radiusM")]
    pub radius_m: u32,
    /// Reference location for radius filtering, typically the device position
    #[serde(default)]
    pub reference: Option<Coordinate>,
}

impl FilterSettings {
    /// Settings that keep every marker
    pub fn unfiltered() -> Self {
        Self {
            favorites_only: false,
            radius_m: 0,
            reference: None,
        }
    }

    /// The active radius constraint, if any
    ///
    /// Radius filtering takes effect only when the radius is positive and a
    /// reference location is present; either missing is treated as "no
    /// radius filtering".
    pub fn active_radius(&self) -> Option<(Coordinate, f64)> {
        match self.reference {
            Some(reference) if self.radius_m > 0 => Some((reference, self.radius_m as f64)),
            _ => None,
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self::unfiltered()
    }
}

/// How favorites and radius constraints compose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Radius filtering, when active, overrides the favorites flag.
    /// This mirrors the shipped app behavior and is the default.
    Standard,
    /// Favorites and radius constraints are both applied when active
    Combined,
}

impl Default for FilterMode {
    fn default() -> Self {
        FilterMode::Standard
    }
}

/// A marker selected for display, decorated with its distance from the
/// reference location when radius filtering was active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayMarker {
    pub id: i64,
    pub coordinate: Coordinate,
    pub title: String,
    pub description: String,
    pub favorite: bool,
    #[serde(rename = "distanceM")]
    pub distance_m: Option<f64>,
}

impl DisplayMarker {
    pub fn from_marker(marker: Marker, distance_m: Option<f64>) -> Self {
        Self {
            id: marker.id,
            coordinate: marker.coordinate,
            title: marker.title,
            description: marker.description,
            favorite: marker.favorite,
            distance_m,
        }
    }
}

/// A map camera region: a center coordinate with latitude/longitude spans
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "latitudeDelta")]
    pub latitude_delta: f64,
    #[serde(rename = "longitudeDelta")]
    pub longitude_delta: f64,
}

impl Region {
    /// The initial camera region centered on a device position
    pub fn around(center: Coordinate) -> Self {
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            latitude_delta: REGION_LATITUDE_DELTA,
            longitude_delta: REGION_LONGITUDE_DELTA,
        }
    }
}

/// Per-device marker collection statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerStats {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub total: i64,
    pub favorites: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: i64, favorite: bool) -> Marker {
        Marker {
            id,
            coordinate: Coordinate::new(40.7128, -74.0060),
            title: format!("Marker {}", id),
            description: String::new(),
            favorite,
        }
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(40.7128, -74.0060).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.1, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_active_radius_requires_both_inputs() {
        let reference = Coordinate::new(40.7128, -74.0060);

        let both = FilterSettings {
            favorites_only: false,
            radius_m: 5000,
            reference: Some(reference),
        };
        assert_eq!(both.active_radius(), Some((reference, 5000.0)));

        let no_reference = FilterSettings {
            favorites_only: false,
            radius_m: 5000,
            reference: None,
        };
        assert_eq!(no_reference.active_radius(), None);

        let zero_radius = FilterSettings {
            favorites_only: false,
            radius_m: 0,
            reference: Some(reference),
        };
        assert_eq!(zero_radius.active_radius(), None);
    }

    #[test]
    fn test_marker_wire_shape() {
        let json = serde_json::to_value(marker(1700000000000, true)).unwrap();
        assert_eq!(json["id"], 1700000000000i64);
        assert_eq!(json["coordinate"]["latitude"], 40.7128);
        assert_eq!(json["favorite"], true);
    }

    #[test]
    fn test_region_around_uses_default_spans() {
        let region = Region::around(Coordinate::new(51.5074, -0.1278));
        assert_eq!(region.latitude, 51.5074);
        assert_eq!(region.latitude_delta, REGION_LATITUDE_DELTA);
        assert_eq!(region.longitude_delta, REGION_LONGITUDE_DELTA);
    }
}
