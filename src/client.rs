// Booking API client: turns payloads into POST /booking calls and HTTP answers into typed results.
// No local validation and no retries; every call reaches the service exactly once.

use crate::booking::{BookingPayload, BookingResponse};
use crate::config::ClientConfig;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use bytes::Bytes;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    // Any non-2xx answer from the service
    #[error("HTTP error {status_code}: {message}")]
    RemoteRequestFailure { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::RemoteRequestFailure { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientStats {
    pub requests_sent: usize,
    pub requests_succeeded: usize,
    // non-2xx answers and transport failures
    pub requests_failed: usize,
}

#[derive(Debug, Default)]
struct StatsCounters {
    sent: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

pub struct BookingClient<T> {
    config: ClientConfig,
    endpoint: String,
    transport: T,
    stats: StatsCounters,
}

impl BookingClient<ReqwestTransport> {
    // Client talking to a real service over the network
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Self::new(config, transport)
    }
}

impl<T: HttpTransport> BookingClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            endpoint: config.booking_url(),
            config,
            transport,
            stats: StatsCounters::default(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Creates a booking and decodes the service's answer.
    ///
    /// The payload is sent verbatim. A non-success status becomes
    /// [`ApiError::RemoteRequestFailure`] carrying the status and the body text.
    pub async fn create_booking(
        &self,
        payload: &BookingPayload,
    ) -> Result<BookingResponse, ApiError> {
        let body = self.execute(payload).await?;
        let created: BookingResponse =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        info!(bookingid = created.bookingid, "booking created");
        Ok(created)
    }

    // Same call as create_booking, returning the JSON body untouched
    pub async fn create_booking_raw(&self, payload: &BookingPayload) -> Result<Value, ApiError> {
        let body = self.execute(payload).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn stats(&self) -> ClientStats {
        ClientStats {
            requests_sent: self.stats.sent.load(Ordering::Relaxed),
            requests_succeeded: self.stats.succeeded.load(Ordering::Relaxed),
            requests_failed: self.stats.failed.load(Ordering::Relaxed),
        }
    }

    async fn execute(&self, payload: &BookingPayload) -> Result<Bytes, ApiError> {
        let body = payload
            .to_json_bytes()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let request = HttpRequest::post_json(self.endpoint.as_str(), body);

        debug!(method = %request.method, url = %request.url, "sending create-booking request");
        self.stats.sent.fetch_add(1, Ordering::Relaxed);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "create-booking request did not complete");
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        if !response.is_success() {
            let message = response.text();
            warn!(status = response.status, %message, "booking service rejected request");
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
            return Err(ApiError::RemoteRequestFailure {
                status_code: response.status,
                message,
            });
        }

        self.stats.succeeded.fetch_add(1, Ordering::Relaxed);
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingDates, BookingRequest};
    use crate::mock_server::StubTransport;
    use crate::transport::HttpMethod;
    use serde_json::json;

    fn sample_payload() -> BookingPayload {
        BookingPayload::from(BookingRequest {
            firstname: "Ivan".to_string(),
            lastname: "Ivanov".to_string(),
            totalprice: 150,
            depositpaid: true,
            bookingdates: BookingDates::new("2025-02-01", "2025-02-10"),
            additionalneeds: Some("Dinner".to_string()),
        })
    }

    fn created_body(bookingid: i64) -> String {
        json!({
            "bookingid": bookingid,
            "booking": {
                "firstname": "Ivan",
                "lastname": "Ivanov",
                "totalprice": 150,
                "depositpaid": true,
                "bookingdates": {"checkin": "2025-02-01", "checkout": "2025-02-10"},
                "additionalneeds": "Dinner"
            }
        })
        .to_string()
    }

    fn client_with(stub: StubTransport) -> BookingClient<StubTransport> {
        BookingClient::new(ClientConfig::new("http://localhost:3001"), stub).unwrap()
    }

    #[tokio::test]
    async fn test_create_booking_decodes_success() {
        let client = client_with(StubTransport::responding(200, created_body(42)));

        let response = client.create_booking(&sample_payload()).await.unwrap();
        assert_eq!(response.bookingid, 42);
        assert_eq!(response.booking.firstname, "Ivan");
        assert_eq!(response.booking.totalprice, Some(150));
        assert_eq!(response.booking.additionalneeds.as_deref(), Some("Dinner"));
    }

    #[tokio::test]
    async fn test_create_booking_sends_single_json_post() {
        let client = client_with(StubTransport::responding(200, created_body(1)));
        let payload = sample_payload();

        client.create_booking(&payload).await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);

        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://localhost:3001/booking");
        assert_eq!(request.header("Content-Type"), Some("application/json"));

        let sent: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(sent, Value::Object(payload.as_map().clone()));
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_remote_failure() {
        let client = client_with(StubTransport::failing(500, "Missing required field: firstname"));

        let error = client
            .create_booking(&sample_payload().without("firstname"))
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ApiError::RemoteRequestFailure {
                status_code: 500,
                message: "Missing required field: firstname".to_string(),
            }
        );
        assert_eq!(error.status_code(), Some(500));
        assert_eq!(error.to_string(), "HTTP error 500: Missing required field: firstname");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let client = client_with(StubTransport::failing(418, "I'm a Teapot"));

        let result = client.create_booking(&sample_payload()).await;
        assert!(result.is_err());
        assert_eq!(client.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_decode_error() {
        let client = client_with(StubTransport::responding(200, "Created"));

        match client.create_booking(&sample_payload()).await {
            Err(ApiError::Decode(_)) => {}
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_is_propagated() {
        let client = client_with(StubTransport::erroring(ApiError::Network(
            "connection refused".to_string(),
        )));

        let error = client.create_booking(&sample_payload()).await.unwrap_err();
        assert_eq!(error, ApiError::Network("connection refused".to_string()));
        assert_eq!(error.status_code(), None);
    }

    #[tokio::test]
    async fn test_raw_response_keeps_body_untouched() {
        let client = client_with(StubTransport::responding(200, created_body(5)));

        let raw = client.create_booking_raw(&sample_payload()).await.unwrap();
        assert_eq!(raw["bookingid"], json!(5));
        assert_eq!(raw["booking"]["bookingdates"]["checkout"], json!("2025-02-10"));
    }

    #[tokio::test]
    async fn test_stats_track_outcomes() {
        let ok_client = client_with(StubTransport::responding(200, created_body(3)));
        ok_client.create_booking(&sample_payload()).await.unwrap();
        ok_client.create_booking(&sample_payload()).await.unwrap();

        assert_eq!(
            ok_client.stats(),
            ClientStats {
                requests_sent: 2,
                requests_succeeded: 2,
                requests_failed: 0,
            }
        );

        let failing_client = client_with(StubTransport::failing(500, "Internal Server Error"));
        let _ = failing_client.create_booking(&sample_payload()).await;

        let stats = failing_client.stats();
        assert_eq!(stats.requests_sent, 1);
        assert_eq!(stats.requests_failed, 1);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = BookingClient::new(
            ClientConfig::new("ftp://bookings"),
            StubTransport::responding(200, "{}"),
        );
        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }

    #[test]
    fn test_connect_builds_network_client() {
        let client = BookingClient::connect(ClientConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "https://restful-booker.herokuapp.com/booking");
        assert_eq!(client.config().timeout_ms, 10_000);
    }
}
