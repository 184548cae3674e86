// Contract test suite for a third-party booking HTTP API

// Export modules for each part of the suite
pub mod booking;
pub mod client;
pub mod config;
pub mod contract;
pub mod fixtures;
pub mod mock_server;
pub mod transport;

// Re-export key types for convenience
pub use booking::{BookedRecord, BookingDates, BookingPayload, BookingRequest, BookingResponse};
pub use client::{ApiError, BookingClient, ClientError, ClientStats};
pub use config::ClientConfig;
pub use contract::{expected_echo, verify_echo, verify_failure, verify_shape, ContractViolation};
pub use mock_server::{BookingSimulator, StubTransport};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
