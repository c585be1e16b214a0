//! Portal API adapter for the two redemption flows.
//!
//! | Flow | validate | commit |
//! |------|----------|--------|
//! | Event check-in | `GET /events/{event}/tickets/{token}` | `POST /events/{event}/check-ins` |
//! | Meal reservation | `GET /meals/{meal}/reservations/{token}?session={session}` | `POST /meals/{meal}/reservations/{token}/use` |

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::models::{ProtocolMode, RedemptionContext, RedemptionInfo, RedemptionReceipt, Token};
use crate::traits::{CommitClient, Headers, HttpClient, HttpError, Response, ValidationClient};

/// Which portal endpoint family to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalFlow {
    /// Event ticket check-in; commits immediately on scan
    EventCheckIn,
    /// Meal reservation use; shows price and waits for confirm
    MealReservation,
}

impl PortalFlow {
    /// Parse a CLI/config name (`event`, `meal`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "event" | "events" | "check-in" => Some(PortalFlow::EventCheckIn),
            "meal" | "meals" | "reservation" => Some(PortalFlow::MealReservation),
            _ => None,
        }
    }

    pub fn protocol_mode(&self) -> ProtocolMode {
        match self {
            PortalFlow::EventCheckIn => ProtocolMode::OnePhase,
            PortalFlow::MealReservation => ProtocolMode::TwoPhase,
        }
    }

    pub fn requires_secondary_id(&self) -> bool {
        matches!(self, PortalFlow::MealReservation)
    }

    fn validate_url(&self, base: &str, context: &RedemptionContext, token: &Token) -> String {
        let resource = urlencoding::encode(&context.resource_id);
        let token = urlencoding::encode(token.as_str());
        match self {
            PortalFlow::EventCheckIn => format!("{}/events/{}/tickets/{}", base, resource, token),
            PortalFlow::MealReservation => {
                let session = context.secondary_id.as_deref().unwrap_or_default();
                format!(
                    "{}/meals/{}/reservations/{}?session={}",
                    base,
                    resource,
                    token,
                    urlencoding::encode(session)
                )
            }
        }
    }

    fn commit_request(
        &self,
        base: &str,
        context: &RedemptionContext,
        token: &Token,
    ) -> (String, serde_json::Value) {
        let resource = urlencoding::encode(&context.resource_id);
        match self {
            PortalFlow::EventCheckIn => (
                format!("{}/events/{}/check-ins", base, resource),
                serde_json::json!({ "token": token.as_str() }),
            ),
            PortalFlow::MealReservation => (
                format!(
                    "{}/meals/{}/reservations/{}/use",
                    base,
                    resource,
                    urlencoding::encode(token.as_str())
                ),
                serde_json::json!({ "session": context.secondary_id }),
            ),
        }
    }
}

const MAX_PLAIN_TEXT_LEN: usize = 120;

/// Error body shapes the portal returns.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Map a non-2xx response to a client error, keeping the portal's text.
pub fn classify_status(response: &Response) -> ClientError {
    let body: ErrorBody = response.json().unwrap_or_default();
    let text = body
        .message
        .or(body.error)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| plain_text_message(response));
    let status = response.status;
    match status {
        404 => ClientError::not_found(text.unwrap_or_else(|| "Code not recognised".to_string())),
        409 => ClientError::already_used(
            text.unwrap_or_else(|| "This code has already been used".to_string()),
        ),
        410 => ClientError::expired(text.unwrap_or_else(|| "This code has expired".to_string())),
        401 | 403 => ClientError::forbidden(
            text.unwrap_or_else(|| "Not allowed to redeem this code here".to_string()),
        ),
        408 | 504 => ClientError::Timeout {
            message: text.unwrap_or_else(|| format!("Portal timed out (HTTP {})", status)),
        },
        _ => ClientError::transport(text.unwrap_or_else(|| format!("Portal returned HTTP {}", status))),
    }
}

/// Short plain-text bodies (proxies, maintenance pages) are shown as-is.
fn plain_text_message(response: &Response) -> Option<String> {
    let text = response.text();
    let text = text.trim();
    if text.is_empty() || text.len() > MAX_PLAIN_TEXT_LEN || text.starts_with(['<', '{', '[']) {
        return None;
    }
    Some(text.to_string())
}

fn convert_http_error(err: HttpError) -> ClientError {
    match err {
        HttpError::Timeout(msg) => ClientError::Timeout { message: msg },
        other => ClientError::transport(other.to_string()),
    }
}

/// [`ValidationClient`] and [`CommitClient`] over the portal REST API.
#[derive(Clone)]
pub struct PortalApiClient {
    http: Arc<dyn HttpClient>,
    config: ApiConfig,
    flow: PortalFlow,
}

impl PortalApiClient {
    pub fn new(http: Arc<dyn HttpClient>, config: ApiConfig, flow: PortalFlow) -> Self {
        Self { http, config, flow }
    }

    pub fn flow(&self) -> PortalFlow {
        self.flow
    }

    fn headers(&self, with_body: bool) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if with_body {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(token) = &self.config.api_token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        if !response.is_success() {
            return Err(classify_status(&response));
        }
        response
            .json()
            .map_err(|e| ClientError::transport(format!("Invalid response from portal: {}", e)))
    }
}

impl std::fmt::Debug for PortalApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalApiClient")
            .field("base_url", &self.config.base_url)
            .field("flow", &self.flow)
            .finish()
    }
}

#[async_trait]
impl ValidationClient for PortalApiClient {
    async fn validate(
        &self,
        token: &Token,
        context: &RedemptionContext,
    ) -> Result<RedemptionInfo, ClientError> {
        let url = self.flow.validate_url(&self.config.base_url, context, token);
        tracing::debug!(flow = ?self.flow, token = %token, "validating");
        let response = self
            .http
            .get(&url, &self.headers(false))
            .await
            .map_err(convert_http_error)?;
        Self::parse(response)
    }

    fn requires_secondary_id(&self) -> bool {
        self.flow.requires_secondary_id()
    }
}

#[async_trait]
impl CommitClient for PortalApiClient {
    async fn commit(
        &self,
        context: &RedemptionContext,
        token: &Token,
    ) -> Result<RedemptionReceipt, ClientError> {
        let (url, body) = self.flow.commit_request(&self.config.base_url, context, token);
        tracing::debug!(flow = ?self.flow, token = %token, "committing");
        let response = self
            .http
            .post(&url, &body.to_string(), &self.headers(true))
            .await
            .map_err(convert_http_error)?;
        Self::parse(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};

    const BASE: &str = "http://portal.test/api";

    fn client(flow: PortalFlow) -> (PortalApiClient, MockHttpClient) {
        let http = MockHttpClient::new();
        let config = ApiConfig::new(BASE).with_api_token("secret");
        (PortalApiClient::new(Arc::new(http.clone()), config, flow), http)
    }

    fn token(s: &str) -> Token {
        Token::new(s).unwrap()
    }

    #[test]
    fn test_flow_from_name() {
        assert_eq!(PortalFlow::from_name("event"), Some(PortalFlow::EventCheckIn));
        assert_eq!(PortalFlow::from_name(" Meal "), Some(PortalFlow::MealReservation));
        assert_eq!(PortalFlow::from_name("library"), None);
        assert_eq!(PortalFlow::EventCheckIn.protocol_mode(), ProtocolMode::OnePhase);
        assert_eq!(PortalFlow::MealReservation.protocol_mode(), ProtocolMode::TwoPhase);
    }

    #[test]
    fn test_urls_are_encoded() {
        let ctx = RedemptionContext::new("E 1");
        let url = PortalFlow::EventCheckIn.validate_url(BASE, &ctx, &token("a/b?c"));
        assert_eq!(url, "http://portal.test/api/events/E%201/tickets/a%2Fb%3Fc");

        let ctx = RedemptionContext::new("M7").with_secondary_id("lunch 2");
        let url = PortalFlow::MealReservation.validate_url(BASE, &ctx, &token("r1"));
        assert_eq!(
            url,
            "http://portal.test/api/meals/M7/reservations/r1?session=lunch%202"
        );
    }

    #[test]
    fn test_classify_status() {
        let used = Response::json_body(409, &serde_json::json!({"message": "Checked in at 09:12"}));
        assert_eq!(
            classify_status(&used),
            ClientError::already_used("Checked in at 09:12")
        );

        let gone = Response::new(410, "");
        assert!(matches!(classify_status(&gone), ClientError::Expired { .. }));

        let denied = Response::json_body(403, &serde_json::json!({"error": "Wrong counter"}));
        assert_eq!(classify_status(&denied), ClientError::forbidden("Wrong counter"));

        let missing = Response::new(404, "not json");
        assert!(matches!(classify_status(&missing), ClientError::NotFound { .. }));

        let broken = Response::new(502, "");
        assert_eq!(
            classify_status(&broken),
            ClientError::transport("Portal returned HTTP 502")
        );
    }

    #[test]
    fn test_classify_status_plain_text_body() {
        let maintenance = Response::new(503, "Scheduled maintenance until 14:00\n");
        assert_eq!(
            classify_status(&maintenance),
            ClientError::transport("Scheduled maintenance until 14:00")
        );

        let html = Response::new(502, "<html><body>Bad Gateway</body></html>");
        assert_eq!(
            classify_status(&html),
            ClientError::transport("Portal returned HTTP 502")
        );
    }

    #[tokio::test]
    async fn test_event_validate_request() {
        let (client, http) = client(PortalFlow::EventCheckIn);
        http.set_response(
            &format!("{}/events/E1/tickets/tok-1", BASE),
            MockResponse::json(
                200,
                serde_json::json!({"holder_name": "Ada", "resource_label": "Welcome Fair"}),
            ),
        );

        let info = client
            .validate(&token("tok-1"), &RedemptionContext::new("E1"))
            .await
            .unwrap();
        assert_eq!(info.holder_name, "Ada");

        let requests = http.get_requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(
            requests[0].headers.get("Authorization").map(String::as_str),
            Some("Bearer secret")
        );
        assert!(!requests[0].headers.contains_key("Content-Type"));
    }

    #[tokio::test]
    async fn test_event_commit_posts_token() {
        let (client, http) = client(PortalFlow::EventCheckIn);
        http.set_response(
            &format!("{}/events/E1/check-ins", BASE),
            MockResponse::json(201, serde_json::json!({"redeemed_at": "2026-05-01T08:00:00Z"})),
        );

        let receipt = client
            .commit(&RedemptionContext::new("E1"), &token("tok-1"))
            .await
            .unwrap();
        assert_eq!(receipt.redeemed_at.to_rfc3339(), "2026-05-01T08:00:00+00:00");

        let request = &http.get_requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.json_body(),
            Some(serde_json::json!({"token": "tok-1"}))
        );
    }

    #[tokio::test]
    async fn test_meal_commit_url_and_body() {
        let (client, http) = client(PortalFlow::MealReservation);
        http.set_default_response(MockResponse::json(
            200,
            serde_json::json!({"redeemed_at": "2026-05-01T12:00:00Z", "amount": 25.0}),
        ));

        let ctx = RedemptionContext::new("M7").with_secondary_id("lunch");
        let receipt = client.commit(&ctx, &token("r-1")).await.unwrap();
        assert_eq!(receipt.amount, Some(25.0));

        let request = &http.get_requests()[0];
        assert_eq!(request.url, format!("{}/meals/M7/reservations/r-1/use", BASE));
        assert_eq!(request.json_body(), Some(serde_json::json!({"session": "lunch"})));
        assert!(client.requires_secondary_id());
    }

    #[tokio::test]
    async fn test_transport_errors_mapped() {
        let (client, http) = client(PortalFlow::EventCheckIn);
        http.set_default_response(MockResponse::Error(HttpError::Timeout("10s".into())));
        let err = client
            .validate(&token("tok"), &RedemptionContext::new("E1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Timeout {
                message: "10s".to_string()
            }
        );

        http.set_default_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".into(),
        )));
        let err = client
            .validate(&token("tok"), &RedemptionContext::new("E1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let (client, http) = client(PortalFlow::EventCheckIn);
        http.set_default_response(MockResponse::Success(Response::new(200, "<html>")));
        let err = client
            .commit(&RedemptionContext::new("E1"), &token("tok"))
            .await
            .unwrap_err();
        assert!(err.message().starts_with("Invalid response from portal"));
    }
}
