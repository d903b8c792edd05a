use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a marker (the save step of the long-press flow)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMarkerRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "device_id", rename = "deviceId")]
    pub device_id: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub favorite: bool,
}

/// Request to toggle a marker's favorite flag
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ToggleFavoriteRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "device_id", rename = "deviceId")]
    pub device_id: String,
}

/// Query parameters identifying a device's marker collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceQuery {
    #[serde(alias = "device_id", rename = "deviceId")]
    pub device_id: String,
}

/// Query parameters for the visible-markers endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibleMarkersQuery {
    #[serde(alias = "device_id", rename = "deviceId")]
    pub device_id: String,
    #[serde(default)]
    #[serde(alias = "favorites_only", rename = "favoritesOnly")]
    pub favorites_only: bool,
    /// Radius in meters; must be one of the recognized picker steps
    #[serde(default)]
    #[serde(alias = "radius_m", rename = "radiusM")]
    pub radius_m: u32,
    /// Explicit reference latitude; when absent the device position is used
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Filter composition mode: "standard" (default) or "combined"
    pub mode: Option<String>,
}
