use serde::{Deserialize, Serialize};
use crate::models::domain::{Coordinate, DisplayMarker, Marker, Region};

/// Response for the full marker collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerListResponse {
    pub markers: Vec<Marker>,
    pub count: usize,
}

/// Response for the visible-markers endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibleMarkersResponse {
    pub markers: Vec<DisplayMarker>,
    pub total_markers: usize,
    /// The reference location radius filtering was measured against, if any
    pub reference: Option<Coordinate>,
}

/// Response for marker mutations (create, toggle favorite, delete)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub marker_id: i64,
    pub operation_id: String,
}

/// Response for the device location endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub device_id: String,
    pub position: Coordinate,
    /// Suggested initial camera region around the position
    pub region: Region,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
