use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::FilterEngine;
use crate::models::{
    Coordinate, CreateMarkerRequest, DeviceQuery, ErrorResponse, FilterMode, FilterSettings,
    HealthResponse, LocationResponse, Marker, MarkerListResponse, MutationResponse, Region,
    ToggleFavoriteRequest, VisibleMarkersQuery, VisibleMarkersResponse,
};
use crate::services::{CacheManager, LocationClient, LocationError, MarkerStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub location: Arc<LocationClient>,
    pub cache: Arc<CacheManager>,
    pub store: Arc<MarkerStore>,
    pub engine: FilterEngine,
}

/// Configure all marker-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::resource("/markers")
                .route(web::post().to(create_marker))
                .route(web::get().to(list_markers)),
        )
        .route("/markers/visible", web::get().to(visible_markers))
        .route("/markers/stats", web::get().to(marker_stats))
        .route("/markers/{id}/favorite", web::post().to(toggle_favorite))
        .route("/markers/{id}", web::delete().to(delete_marker))
        .route("/location", web::get().to(device_location))
        .route("/debug/echo", web::post().to(debug_echo));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Debug endpoint to echo raw JSON for client debugging
async fn debug_echo(body: web::Bytes, req: actix_web::HttpRequest) -> impl Responder {
    let body_str = String::from_utf8_lossy(&body);
    tracing::info!(
        "DEBUG echo - path: {}, method: {}, body: {}",
        req.path(),
        req.method(),
        body_str
    );
    HttpResponse::Ok().json(serde_json::json!({
        "path": req.path(),
        "method": req.method().to_string(),
        "body": body_str,
    }))
}

fn store_error_response(context: &str, err: &StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(what) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: what.clone(),
            status_code: 404,
        }),
        StoreError::InvalidInput(what) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid input".to_string(),
            message: what.clone(),
            status_code: 400,
        }),
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Parse the filter composition mode from its query form
fn parse_mode(raw: Option<&str>) -> Result<FilterMode, ()> {
    match raw {
        None | Some("standard") => Ok(FilterMode::Standard),
        Some("combined") => Ok(FilterMode::Combined),
        Some(_) => Err(()),
    }
}

/// Fetch a device's marker collection, read-through the cache
async fn load_markers(state: &AppState, device_id: &str) -> Result<Vec<Marker>, StoreError> {
    if let Ok(markers) = state.cache.get_markers(device_id).await {
        return Ok(markers);
    }

    let markers = state.store.list_markers(device_id).await?;

    if let Err(e) = state.cache.put_markers(device_id, &markers).await {
        tracing::warn!("Failed to cache markers for {}: {}", device_id, e);
    }

    Ok(markers)
}

/// Create a marker
///
/// POST /api/v1/markers
///
/// Request body:
/// ```json
/// {
///   "deviceId": "string",
///   "latitude": 40.7128,
///   "longitude": -74.0060,
///   "title": "string",
///   "description": "string",
///   "favorite": false
/// }
/// ```
async fn create_marker(
    state: web::Data<AppState>,
    req: web::Json<CreateMarkerRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_marker request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let coordinate = Coordinate::new(req.latitude, req.longitude);

    let marker = match state
        .store
        .create_marker(
            &req.device_id,
            coordinate,
            &req.title,
            &req.description,
            req.favorite,
        )
        .await
    {
        Ok(marker) => marker,
        Err(e) => return store_error_response("Failed to create marker", &e),
    };

    if let Err(e) = state.cache.invalidate_device(&req.device_id).await {
        tracing::warn!("Failed to invalidate cache: {}", e);
    }

    tracing::info!("Created marker {} for device {}", marker.id, req.device_id);

    HttpResponse::Ok().json(marker)
}

/// Get a device's full marker collection
///
/// GET /api/v1/markers?deviceId={deviceId}
async fn list_markers(
    state: web::Data<AppState>,
    query: web::Query<DeviceQuery>,
) -> impl Responder {
    let markers = match load_markers(&state, &query.device_id).await {
        Ok(markers) => markers,
        Err(e) => return store_error_response("Failed to list markers", &e),
    };

    let count = markers.len();
    HttpResponse::Ok().json(MarkerListResponse { markers, count })
}

/// Compute the display set for a device
///
/// GET /api/v1/markers/visible?deviceId={deviceId}&favoritesOnly=false&radiusM=5000
///
/// When radius filtering is requested without an explicit reference
/// coordinate, the device's current position is fetched from the location
/// gateway; if that fails the request proceeds without radius filtering.
async fn visible_markers(
    state: web::Data<AppState>,
    query: web::Query<VisibleMarkersQuery>,
) -> impl Responder {
    if !state.engine.is_recognized_radius(query.radius_m) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Unrecognized radius".to_string(),
            message: format!(
                "radiusM must be one of {:?}, got {}",
                state.engine.radius_steps(),
                query.radius_m
            ),
            status_code: 400,
        });
    }

    let mode = match parse_mode(query.mode.as_deref()) {
        Ok(mode) => mode,
        Err(()) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid mode".to_string(),
                message: "mode must be one of: standard, combined".to_string(),
                status_code: 400,
            });
        }
    };

    let reference = match (query.latitude, query.longitude) {
        (Some(latitude), Some(longitude)) => {
            let coordinate = Coordinate::new(latitude, longitude);
            if !coordinate.is_valid() {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Invalid reference".to_string(),
                    message: format!("coordinate out of range: ({}, {})", latitude, longitude),
                    status_code: 400,
                });
            }
            Some(coordinate)
        }
        (None, None) if query.radius_m > 0 => {
            // Radius filtering without an explicit reference: ask the gateway
            match state.location.current_position(&query.device_id).await {
                Ok(position) => Some(position),
                Err(e) => {
                    tracing::warn!(
                        "No device position for {}, radius filter disabled: {}",
                        query.device_id,
                        e
                    );
                    None
                }
            }
        }
        (None, None) => None,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid reference".to_string(),
                message: "latitude and longitude must be provided together".to_string(),
                status_code: 400,
            });
        }
    };

    let markers = match load_markers(&state, &query.device_id).await {
        Ok(markers) => markers,
        Err(e) => return store_error_response("Failed to load markers", &e),
    };

    let settings = FilterSettings {
        favorites_only: query.favorites_only,
        radius_m: query.radius_m,
        reference,
    };

    let active_reference = settings.active_radius().map(|(coordinate, _)| coordinate);
    let result = state.engine.select(markers, &settings, mode);

    tracing::info!(
        "Returning {} of {} markers for device {}",
        result.markers.len(),
        result.total_markers,
        query.device_id
    );

    HttpResponse::Ok().json(VisibleMarkersResponse {
        markers: result.markers,
        total_markers: result.total_markers,
        reference: active_reference,
    })
}

/// Collection statistics for a device
///
/// GET /api/v1/markers/stats?deviceId={deviceId}
async fn marker_stats(
    state: web::Data<AppState>,
    query: web::Query<DeviceQuery>,
) -> impl Responder {
    match state.store.marker_stats(&query.device_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => store_error_response("Failed to fetch marker stats", &e),
    }
}

/// Toggle a marker's favorite flag
///
/// POST /api/v1/markers/{id}/favorite
///
/// Request body:
/// ```json
/// { "deviceId": "string" }
/// ```
async fn toggle_favorite(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<ToggleFavoriteRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let marker_id = path.into_inner();

    let marker = match state.store.toggle_favorite(&req.device_id, marker_id).await {
        Ok(marker) => marker,
        Err(e) => return store_error_response("Failed to toggle favorite", &e),
    };

    if let Err(e) = state.cache.invalidate_device(&req.device_id).await {
        tracing::warn!("Failed to invalidate cache: {}", e);
    }

    tracing::debug!(
        "Marker {} favorite -> {} for device {}",
        marker.id,
        marker.favorite,
        req.device_id
    );

    HttpResponse::Ok().json(marker)
}

/// Delete a marker
///
/// DELETE /api/v1/markers/{id}?deviceId={deviceId}
async fn delete_marker(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<DeviceQuery>,
) -> impl Responder {
    let marker_id = path.into_inner();

    let removed = match state.store.delete_marker(&query.device_id, marker_id).await {
        Ok(removed) => removed,
        Err(e) => return store_error_response("Failed to delete marker", &e),
    };

    if !removed {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: format!("marker {} for device {}", marker_id, query.device_id),
            status_code: 404,
        });
    }

    if let Err(e) = state.cache.invalidate_device(&query.device_id).await {
        tracing::warn!("Failed to invalidate cache: {}", e);
    }

    HttpResponse::Ok().json(MutationResponse {
        success: true,
        marker_id,
        operation_id: uuid::Uuid::new_v4().to_string(),
    })
}

/// Current device position plus the initial camera region
///
/// GET /api/v1/location?deviceId={deviceId}
async fn device_location(
    state: web::Data<AppState>,
    query: web::Query<DeviceQuery>,
) -> impl Responder {
    match state.location.current_position(&query.device_id).await {
        Ok(position) => HttpResponse::Ok().json(LocationResponse {
            device_id: query.device_id.clone(),
            position,
            region: Region::around(position),
        }),
        Err(LocationError::NotFound(device)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "No position".to_string(),
            message: format!("no position known for device {}", device),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch position for {}: {}", query.device_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch position".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode(None), Ok(FilterMode::Standard));
        assert_eq!(parse_mode(Some("standard")), Ok(FilterMode::Standard));
        assert_eq!(parse_mode(Some("combined")), Ok(FilterMode::Combined));
        assert!(parse_mode(Some("legacy")).is_err());
    }
}
