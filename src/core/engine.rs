use crate::core::{
    distance::haversine_distance,
    filters::{is_visible, is_visible_combined},
};
use crate::models::{DisplayMarker, FilterMode, FilterSettings, Marker};

/// Radius steps the app exposes in its picker; 0 disables radius filtering
pub const DEFAULT_RADIUS_STEPS: [u32; 4] = [0, 2000, 5000, 10000];

/// Result of a display-set computation
#[derive(Debug)]
pub struct SelectionResult {
    pub markers: Vec<DisplayMarker>,
    pub total_markers: usize,
}

/// Display-set orchestrator
///
/// Validates filter settings against the recognized radius steps, applies
/// the visibility policy to a marker snapshot and decorates the kept
/// markers with their distance from the reference location when radius
/// filtering is active. Holds no marker state; every call works on the
/// snapshot it is given.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    radius_steps: Vec<u32>,
}

impl FilterEngine {
    pub fn new(radius_steps: Vec<u32>) -> Self {
        Self { radius_steps }
    }

    pub fn with_default_steps() -> Self {
        Self {
            radius_steps: DEFAULT_RADIUS_STEPS.to_vec(),
        }
    }

    pub fn radius_steps(&self) -> &[u32] {
        &self.radius_steps
    }

    /// Whether a radius value is one of the configured picker steps
    pub fn is_recognized_radius(&self, radius_m: u32) -> bool {
        self.radius_steps.contains(&radius_m)
    }

    /// Compute the display set for a marker snapshot
    ///
    /// The returned markers are an order-preserving subsequence of the
    /// input. `distance_m` is populated on every returned marker when a
    /// radius constraint was active, and absent otherwise.
    pub fn select(
        &self,
        markers: Vec<Marker>,
        settings: &FilterSettings,
        mode: FilterMode,
    ) -> SelectionResult {
        let total_markers = markers.len();
        let active_radius = settings.active_radius();

        let markers = markers
            .into_iter()
            .filter(|marker| match mode {
                FilterMode::Standard => is_visible(marker, settings),
                FilterMode::Combined => is_visible_combined(marker, settings),
            })
            .map(|marker| {
                let distance_m = active_radius
                    .map(|(reference, _)| haversine_distance(reference, marker.coordinate));
                DisplayMarker::from_marker(marker, distance_m)
            })
            .collect();

        SelectionResult {
            markers,
            total_markers,
        }
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::with_default_steps()
    }
}
