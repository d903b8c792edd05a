use crate::core::distance::haversine_distance;
use crate::models::{Coordinate, FilterSettings, Marker};

/// Check whether a marker lies within a radius of a reference location
///
/// The boundary is inclusive: a marker exactly at the radius is kept.
#[inline]
pub fn within_radius(marker: &Marker, reference: Coordinate, radius_m: f64) -> bool {
    haversine_distance(reference, marker.coordinate) <= radius_m
}

/// Check whether a single marker is visible under the given settings
///
/// When radius filtering is active (positive radius and a reference
/// location), visibility is decided by distance alone and the favorites
/// flag is ignored. Otherwise the favorites flag alone decides.
#[inline]
pub fn is_visible(marker: &Marker, settings: &FilterSettings) -> bool {
    match settings.active_radius() {
        Some((reference, radius_m)) => within_radius(marker, reference, radius_m),
        None => !settings.favorites_only || marker.favorite,
    }
}

/// Visibility with favorites and radius constraints composed
///
/// Opt-in alternative to [`is_visible`] for callers that want "favorite AND
/// within radius" semantics when both constraints are active.
#[inline]
pub fn is_visible_combined(marker: &Marker, settings: &FilterSettings) -> bool {
    if settings.favorites_only && !marker.favorite {
        return false;
    }
    match settings.active_radius() {
        Some((reference, radius_m)) => within_radius(marker, reference, radius_m),
        None => true,
    }
}

/// Compute the display set for a marker collection
///
/// Returns an order-preserving subsequence of `markers`; the result is never
/// resorted by distance or favorite status. Pure function of its inputs.
pub fn filter_markers(markers: &[Marker], settings: &FilterSettings) -> Vec<Marker> {
    markers
        .iter()
        .filter(|marker| is_visible(marker, settings))
        .cloned()
        .collect()
}

/// [`filter_markers`] with the combined favorites-and-radius semantics
pub fn filter_markers_combined(markers: &[Marker], settings: &FilterSettings) -> Vec<Marker> {
    markers
        .iter()
        .filter(|marker| is_visible_combined(marker, settings))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_at(id: i64, latitude: f64, longitude: f64, favorite: bool) -> Marker {
        Marker {
            id,
            coordinate: Coordinate::new(latitude, longitude),
            title: format!("Marker {}", id),
            description: "test".to_string(),
            favorite,
        }
    }

    fn reference() -> Coordinate {
        Coordinate::new(0.0, 0.0)
    }

    #[test]
    fn test_no_filters_is_identity() {
        let markers = vec![
            marker_at(1, 0.0, 0.0, false),
            marker_at(2, 0.1, 0.1, true),
            marker_at(3, 0.2, 0.2, false),
        ];

        let result = filter_markers(&markers, &FilterSettings::unfiltered());
        assert_eq!(result, markers);
    }

    #[test]
    fn test_favorites_only_keeps_favorites_in_order() {
        let markers = vec![
            marker_at(1, 0.0, 0.0, true),
            marker_at(2, 0.1, 0.1, false),
            marker_at(3, 0.2, 0.2, true),
        ];

        let settings = FilterSettings {
            favorites_only: true,
            radius_m: 0,
            reference: None,
        };

        let result = filter_markers(&markers, &settings);
        let ids: Vec<i64> = result.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_radius_overrides_favorites_flag() {
        // ~0m non-favorite and ~6000m favorite; radius 5000 with favorites
        // requested keeps only the near non-favorite.
        let markers = vec![
            marker_at(1, 0.0, 0.0, false),
            marker_at(2, 0.054, 0.0, true),
        ];

        let settings = FilterSettings {
            favorites_only: true,
            radius_m: 5000,
            reference: Some(reference()),
        };

        let result = filter_markers(&markers, &settings);
        let ids: Vec<i64> = result.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_radius_without_reference_falls_back_to_favorites() {
        let markers = vec![
            marker_at(1, 0.0, 0.0, false),
            marker_at(2, 0.054, 0.0, true),
        ];

        let settings = FilterSettings {
            favorites_only: true,
            radius_m: 5000,
            reference: None,
        };

        let result = filter_markers(&markers, &settings);
        let ids: Vec<i64> = result.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_marker_exactly_at_radius_is_kept() {
        // 1 degree of longitude at the equator is ~111195m
        let markers = vec![marker_at(1, 0.0, 1.0, false)];
        let exact = haversine_distance(reference(), markers[0].coordinate);

        let settings = FilterSettings {
            favorites_only: false,
            radius_m: exact.ceil() as u32,
            reference: Some(reference()),
        };
        assert_eq!(filter_markers(&markers, &settings).len(), 1);

        let just_under = FilterSettings {
            favorites_only: false,
            radius_m: exact.floor() as u32 - 1,
            reference: Some(reference()),
        };
        assert!(filter_markers(&markers, &just_under).is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let markers = vec![
            marker_at(1, 0.0, 0.0, false),
            marker_at(2, 0.01, 0.01, true),
            marker_at(3, 1.0, 1.0, true),
        ];

        let settings = FilterSettings {
            favorites_only: false,
            radius_m: 5000,
            reference: Some(reference()),
        };

        let once = filter_markers(&markers, &settings);
        let twice = filter_markers(&once, &settings);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_combined_mode_applies_both_constraints() {
        let markers = vec![
            marker_at(1, 0.0, 0.0, false),
            marker_at(2, 0.01, 0.0, true),
            marker_at(3, 0.054, 0.0, true),
        ];

        let settings = FilterSettings {
            favorites_only: true,
            radius_m: 5000,
            reference: Some(reference()),
        };

        let result = filter_markers_combined(&markers, &settings);
        let ids: Vec<i64> = result.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_combined_mode_without_radius_matches_standard() {
        let markers = vec![
            marker_at(1, 0.0, 0.0, true),
            marker_at(2, 0.1, 0.1, false),
        ];

        let settings = FilterSettings {
            favorites_only: true,
            radius_m: 0,
            reference: None,
        };

        assert_eq!(
            filter_markers(&markers, &settings),
            filter_markers_combined(&markers, &settings)
        );
    }
}
