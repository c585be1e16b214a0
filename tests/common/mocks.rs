//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `portal_redeem::adapters::mock` and provides portal response presets.

pub use portal_redeem::adapters::mock::{
    MockHttpClient, MockRedemptionClient, MockResponse, RecordedRequest,
};
pub use portal_redeem::traits::HttpError;

use serde_json::json;

/// Configuration for a mock portal API behind [`MockHttpClient`].
pub struct MockPortalConfig {
    client: MockHttpClient,
}

impl MockPortalConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Respond to `url` with a JSON body.
    pub fn with_json(self, url: &str, status: u16, body: serde_json::Value) -> Self {
        self.client.set_response(url, MockResponse::json(status, body));
        self
    }

    /// Respond to `url` with the portal's error envelope.
    pub fn with_rejection(self, url: &str, status: u16, message: &str) -> Self {
        self.client
            .set_response(url, MockResponse::json(status, json!({ "message": message })));
        self
    }

    /// Fail `url` at the transport level.
    pub fn with_transport_error(self, url: &str, error: HttpError) -> Self {
        self.client.set_response(url, MockResponse::Error(error));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockPortalConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation body for an event ticket.
pub fn ticket_body(holder: &str) -> serde_json::Value {
    json!({
        "holder_name": holder,
        "holder_id": "S-1001",
        "resource_label": "Spring Concert"
    })
}

/// Validation body for a meal reservation.
pub fn reservation_body(holder: &str, price: f64) -> serde_json::Value {
    json!({
        "holder_name": holder,
        "resource_label": "Lunch, Hall A",
        "price": price,
        "currency": "EUR"
    })
}

/// Commit body.
pub fn receipt_body(id: &str) -> serde_json::Value {
    json!({
        "receipt_id": id,
        "redeemed_at": "2026-03-02T12:00:00Z"
    })
}
