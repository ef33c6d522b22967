//! Transport layer shared by every resource group: one `reqwest` client
//! with the fixed request timeout, bearer-token injection read from the
//! session store at request time, and the global unauthorized handler.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, GENERIC_ERROR};
use crate::session::SessionStore;

/// Shape the server uses for error payloads. Both field names appear in
/// the wild depending on the endpoint, so we accept either.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

pub struct HttpClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    timeout_ms: u64,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| ApiError::Network(error.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            timeout_ms: config.request_timeout.as_millis() as u64,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.prepare(Method::GET, path)).await
    }

    pub async fn get_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.prepare(Method::GET, path).query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.prepare(Method::POST, path).json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.prepare(Method::PUT, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.prepare(Method::DELETE, path)).await
    }

    fn prepare(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, %url, "issuing API request");
        let mut builder = self.client.request(method, url);
        // The token slot is read at request time, never cached per call.
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|error| self.map_transport_error(error))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| self.map_transport_error(error))?;
        self.decode(status, &body)
    }

    /// Turn a status + body into the typed result. An unauthorized status
    /// from any call evicts the stored session as a side effect; this is
    /// deliberately cross-cutting rather than scoped to the failing call.
    fn decode<T: DeserializeOwned>(&self, status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
        if status == StatusCode::UNAUTHORIZED {
            warn!("unauthorized response, evicting stored session");
            self.session.invalidate();
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(body),
            });
        }
        serde_json::from_slice(body).map_err(|error| ApiError::Decode(error.to_string()))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout_ms)
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

/// Server-provided message when the body carries one, generic otherwise.
fn extract_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::session::{SessionEvent, StoredSession};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pong {
        ok: bool,
    }

    fn client_with_session() -> (HttpClient, Arc<SessionStore>) {
        let session = Arc::new(SessionStore::in_memory());
        session
            .set(StoredSession {
                token: "tok-123".to_string(),
                user_id: "usr-1".to_string(),
                role: Role::Guest,
            })
            .unwrap();
        let http = HttpClient::new(&ClientConfig::default(), Arc::clone(&session)).unwrap();
        (http, session)
    }

    #[test]
    fn success_decodes_into_the_typed_response() {
        let (http, _session) = client_with_session();
        let result: Pong = http.decode(StatusCode::OK, br#"{"ok": true}"#).unwrap();
        assert_eq!(result, Pong { ok: true });
    }

    #[test]
    fn unauthorized_from_any_call_evicts_the_session() {
        let (http, session) = client_with_session();
        let mut events = session.subscribe();

        let result = http.decode::<Pong>(StatusCode::UNAUTHORIZED, b"{}");

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(session.token().is_none(), "token must be removed");
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[test]
    fn business_rejection_carries_the_server_message() {
        let (http, session) = client_with_session();
        let result = http.decode::<Pong>(
            StatusCode::CONFLICT,
            br#"{"message": "Listing is already booked for these dates"}"#,
        );

        match result {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 409);
                assert_eq!(message, "Listing is already booked for these dates");
            }
            other => panic!("expected business rejection, got {other:?}"),
        }
        // Only 401 touches the session.
        assert!(session.token().is_some());
    }

    #[test]
    fn error_without_usable_body_falls_back_to_generic_message() {
        let (http, _session) = client_with_session();
        let bodies: [&[u8]; 3] = [b"", b"<html>oops</html>", br#"{"message": ""}"#];
        for body in bodies {
            let result = http.decode::<Pong>(StatusCode::INTERNAL_SERVER_ERROR, body);
            match result {
                Err(ApiError::Api { message, .. }) => assert_eq!(message, GENERIC_ERROR),
                other => panic!("expected api error, got {other:?}"),
            }
        }
    }

    #[test]
    fn alternate_error_field_name_is_accepted() {
        assert_eq!(
            extract_message(br#"{"error": "Capacity exceeded"}"#),
            "Capacity exceeded"
        );
    }

    #[test]
    fn malformed_success_body_maps_to_decode_error() {
        let (http, _session) = client_with_session();
        let result = http.decode::<Pong>(StatusCode::OK, b"not json");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
