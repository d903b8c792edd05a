use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::Coordinate;

/// Errors that can occur when talking to the Geolink location gateway
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("No position for device: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Position record as the gateway reports it
#[derive(Debug, Deserialize)]
struct GatewayPosition {
    latitude: f64,
    longitude: f64,
    #[serde(rename = "accuracyM", default)]
    accuracy_m: Option<f64>,
}

/// Geolink location gateway client
///
/// Supplies the device's current coordinate, used as the reference location
/// for radius filtering and for the "Find Me" endpoint. Nothing else crosses
/// this boundary.
pub struct LocationClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl LocationClient {
    /// Create a new location client
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// Fetch the device's current position
    pub async fn current_position(&self, device_id: &str) -> Result<Coordinate, LocationError> {
        let url = format!(
            "{}/v1/devices/{}/position",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(device_id)
        );

        tracing::debug!("Fetching position from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Geolink-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LocationError::NotFound(device_id.to_string()));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(LocationError::Unauthorized);
        }
        if !status.is_success() {
            return Err(LocationError::ApiError(format!(
                "Failed to fetch position: {}",
                status
            )));
        }

        let position: GatewayPosition = response
            .json()
            .await
            .map_err(|e| LocationError::InvalidResponse(format!("Failed to parse position: {}", e)))?;

        let coordinate = Coordinate::new(position.latitude, position.longitude);
        if !coordinate.is_valid() {
            return Err(LocationError::InvalidResponse(format!(
                "gateway returned out-of-range coordinate ({}, {})",
                position.latitude, position.longitude
            )));
        }

        if let Some(accuracy) = position.accuracy_m {
            tracing::trace!("Position accuracy for {}: {}m", device_id, accuracy);
        }

        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_client_creation() {
        let client = LocationClient::new(
            "https://geolink.test/api".to_string(),
            "test_key".to_string(),
        );

        assert_eq!(client.base_url, "https://geolink.test/api");
        assert_eq!(client.api_key, "test_key");
    }

    #[tokio::test]
    async fn test_current_position_parses_gateway_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/devices/device-1/position")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"latitude":40.7128,"longitude":-74.0060,"accuracyM":12.5}"#)
            .create_async()
            .await;

        let client = LocationClient::new(server.url(), "test_key".to_string());
        let position = client.current_position("device-1").await.unwrap();

        assert_eq!(position.latitude, 40.7128);
        assert_eq!(position.longitude, -74.0060);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_current_position_missing_device() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/devices/ghost/position")
            .with_status(404)
            .create_async()
            .await;

        let client = LocationClient::new(server.url(), "test_key".to_string());
        let err = client.current_position("ghost").await.unwrap_err();

        assert!(matches!(err, LocationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_current_position_rejects_out_of_range() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/devices/device-1/position")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"latitude":123.0,"longitude":0.0}"#)
            .create_async()
            .await;

        let client = LocationClient::new(server.url(), "test_key".to_string());
        let err = client.current_position("device-1").await.unwrap_err();

        assert!(matches!(err, LocationError::InvalidResponse(_)));
    }
}
