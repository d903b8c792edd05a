//! Atlas Markers - marker storage and filtering service for the Atlas map app
//!
//! This library holds the display-set computation used by the Atlas map app:
//! a pure great-circle distance function and the marker filter policy, plus
//! the storage, cache and location-gateway services around them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{filter_markers, haversine_distance, FilterEngine};
pub use self::models::{Coordinate, DisplayMarker, FilterMode, FilterSettings, Marker, Region};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let markers = vec![Marker {
            id: 1,
            coordinate: Coordinate::new(40.7128, -74.0060),
            title: "Test".to_string(),
            description: String::new(),
            favorite: false,
        }];
        let visible = filter_markers(&markers, &FilterSettings::unfiltered());
        assert_eq!(visible.len(), 1);
    }
}
