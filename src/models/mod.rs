// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinate, DisplayMarker, FilterMode, FilterSettings, Marker, MarkerStats, Region};
pub use requests::{CreateMarkerRequest, DeviceQuery, ToggleFavoriteRequest, VisibleMarkersQuery};
pub use responses::{
    ErrorResponse, HealthResponse, LocationResponse, MarkerListResponse, MutationResponse,
    VisibleMarkersResponse,
};
