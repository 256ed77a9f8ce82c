//! Admin API HTTP client for attendance records.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::auth::{TokenProvider, bearer_value};
use crate::error::{AppError, Result};
use crate::models::attendance::{AttendanceRecord, RecordEnvelope, UpdateAttendance};

/// Attendance API client.
///
/// Every request carries `Authorization: Bearer <token>`, with the token
/// pulled from the [`TokenProvider`] at the moment the request is built.
#[derive(Clone)]
pub struct AbsensiClient {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl AbsensiClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "http://localhost:8000/api")
    /// * `timeout` - Per-request timeout
    /// * `tokens` - Bearer token source
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| AppError::config(format!("Invalid API URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!("API URL '{base_url}' cannot be used as a base")));
        }
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/absensi/{id}`, with `id` escaped as a single path segment.
    pub fn record_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("absensi").push(id);
        }
        url
    }

    fn authorization(&self) -> String {
        let token = self.tokens.token();
        if token.is_none() {
            tracing::warn!("No bearer token in storage, request will likely be rejected");
        }
        bearer_value(token.as_deref())
    }

    /// Read one attendance record.
    pub async fn fetch_record(&self, id: &str) -> Result<AttendanceRecord> {
        let url = self.record_url(id);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.authorization())
            .send()
            .await?;
        let response = error_for_status(response).await?;

        let body = response.bytes().await?;
        let envelope: RecordEnvelope =
            serde_json::from_slice(&body).map_err(|e| AppError::decode(format!("Unexpected record body: {e}")))?;

        Ok(envelope.data)
    }

    /// Send a partial update for one attendance record.
    pub async fn update_record(&self, id: &str, update: &UpdateAttendance) -> Result<()> {
        let url = self.record_url(id);
        tracing::debug!("PUT {} ({} fields)", url, update.len());

        let response = self
            .client
            .put(url)
            .header(AUTHORIZATION, self.authorization())
            .json(update)
            .send()
            .await?;
        error_for_status(response).await?;

        Ok(())
    }

    /// Check that the API root answers at all. Returns the status it gave.
    pub async fn test_connection(&self) -> Result<StatusCode> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        Ok(response.status())
    }
}

/// Turn a non-success response into [`AppError::Status`], keeping the body.
async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    Err(AppError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;

    fn client(base: &str) -> AbsensiClient {
        AbsensiClient::new(base, Duration::from_secs(5), Arc::new(StaticToken::default())).unwrap()
    }

    #[test]
    fn test_record_url() {
        assert_eq!(client("http://localhost:8000").record_url("7").as_str(), "http://localhost:8000/absensi/7");
        assert_eq!(
            client("http://localhost:8000/api/").record_url("7").as_str(),
            "http://localhost:8000/api/absensi/7"
        );
    }

    #[test]
    fn test_record_url_escapes_id() {
        let url = client("http://localhost").record_url("a/b c");
        assert_eq!(url.as_str(), "http://localhost/absensi/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = AbsensiClient::new("not a url", Duration::from_secs(5), Arc::new(StaticToken::default()));
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = AbsensiClient::new("mailto:x@y", Duration::from_secs(5), Arc::new(StaticToken::default()));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
