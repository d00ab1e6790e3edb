mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

/// Issues a `GET` for `url` and decodes the body as JSON.
///
/// Any non-2xx status is an error carrying the raw body, so callers can log
/// what the server actually said.
#[tracing::instrument(skip(client))]
pub async fn fetch_json<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Value, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?;
    let status = resp.status();
    let body = resp.text().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "Response received");

    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| FetchError::InvalidJson {
        reason: e.to_string(),
        body,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers every request with the same status and body, remembering the urls.
    pub(crate) struct CannedClient {
        status: u16,
        body: String,
        pub(crate) seen: Mutex<Vec<String>>,
    }

    impl CannedClient {
        pub(crate) fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for CannedClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.seen.lock().unwrap().push(req.url().to_string());
            let resp = http::Response::builder()
                .status(self.status)
                .body(self.body.clone())
                .unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }

    #[tokio::test]
    async fn test_fetch_json_success() {
        let client = CannedClient::new(200, r#"{"Arson": "1.5"}"#);
        let value = fetch_json(&client, "http://localhost/api").await.unwrap();
        assert_eq!(value["Arson"], "1.5");
        assert_eq!(client.seen.lock().unwrap().as_slice(), ["http://localhost/api"]);
    }

    #[tokio::test]
    async fn test_fetch_json_server_error_keeps_body() {
        let client = CannedClient::new(500, "Internal Server Error");
        let err = fetch_json(&client, "http://localhost/api").await.unwrap_err();
        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_json_invalid_body() {
        let client = CannedClient::new(200, "<html>");
        let err = fetch_json(&client, "http://localhost/api").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidJson { .. }));
        assert_eq!(err.raw_body(), Some("<html>"));
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_bad_url() {
        let client = CannedClient::new(200, "{}");
        let err = fetch_json(&client, "not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert!(client.seen.lock().unwrap().is_empty());
    }
}
