//! The dispatch primitive.

use crate::{ApiRequest, ApiResponse, TransportError, TransportResult};
use bfarm_storage::Credential;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Sends one request with the given credential attached.
///
/// Holds a `reqwest::Client` with a bounded timeout. Performs no retries.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    base_url: Url,
}

impl Dispatcher {
    /// Create a dispatcher for the given API base URL.
    pub fn new(base_url: &str, timeout: Duration) -> TransportResult<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send `request`, attaching `Authorization: Bearer <access_token>` when a
    /// credential is present.
    ///
    /// Returns `Ok` for 2xx, `TransportError::Http` for any other status and
    /// `TransportError::Network` for transport failures.
    pub async fn send(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> TransportResult<ApiResponse> {
        let url = self.join(&request.path)?;

        debug!(method = %request.method, url = %url, "Dispatching request");

        let mut builder = self.client.request(request.method.clone(), url);

        if let Some(credential) = credential {
            builder = builder.header(
                "Authorization",
                format!("Bearer {}", credential.access_token),
            );
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn join(&self, path: &str) -> TransportResult<Url> {
        // Keep any base path ("/api") intact; Url::join would drop it for
        // absolute paths.
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credential(token: &str) -> Credential {
        Credential {
            access_token: token.to_string(),
            refresh_token: "refresh".to_string(),
            role: None,
        }
    }

    #[test]
    fn test_join_preserves_base_path() {
        let dispatcher =
            Dispatcher::new("https://api.bfarm.site/api", Duration::from_secs(5)).unwrap();
        let url = dispatcher.join("/items").unwrap();
        assert_eq!(url.as_str(), "https://api.bfarm.site/api/items");
    }

    #[tokio::test]
    async fn test_bearer_header_attached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(header("Authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let response = dispatcher
            .send(&ApiRequest::get("/items"), Some(&credential("T1")))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_no_header_without_credential() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/public"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let response = dispatcher
            .send(&ApiRequest::get("/public"), None)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let received = server.received_requests().await.unwrap();
        assert!(received[0].headers.get("Authorization").is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_maps_to_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = dispatcher
            .send(&ApiRequest::get("/missing"), None)
            .await
            .unwrap_err();

        match err {
            TransportError::Http { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_401_is_auth_expired() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = dispatcher
            .send(&ApiRequest::get("/items"), Some(&credential("stale")))
            .await
            .unwrap_err();

        assert!(err.is_auth_expired());
    }
}
