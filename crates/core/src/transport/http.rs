//! HTTP transport backed by `reqwest`.
//!
//! Endpoints are resolved against a base URL:
//! - `POST {base}/upload`  multipart, one file part
//! - `POST {base}/train`   JSON `{x_column, y_column}`
//! - `POST {base}/predict` JSON `{value}`

use crate::config::error::{ConfigError, ConfigResult};
use crate::transport::base::{FilePayload, Transport, TransportError};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use rk_protocol::config_models::ServerConfig;
use rk_protocol::wire_models::{
    ErrorResponse, IngestResponse, PredictRequest, PredictResponse, TrainRequest, TrainResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Talks to the statistical service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    upload_field: String,
}

impl HttpTransport {
    /// Create a transport for `base_url`.
    ///
    /// A trailing slash is added to the base so that endpoint names are
    /// appended rather than replacing its last path segment.
    pub fn new(
        base_url: Url,
        upload_field: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: with_trailing_slash(base_url),
            upload_field: upload_field.into(),
        })
    }

    /// Build a transport from the `[server]` config section.
    pub fn from_config(config: &ServerConfig) -> ConfigResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let timeout = config.timeout_secs.map(Duration::from_secs);

        Self::new(base_url, config.upload_field.clone(), timeout).map_err(|e| {
            ConfigError::InvalidValue {
                key: "server".to_string(),
                reason: format!("failed to create HTTP client: {e}"),
            }
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(name)
            .map_err(|e| TransportError::Network(format!("invalid endpoint '{name}': {e}")))
    }

    async fn post_json<B, T>(&self, name: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(name)?;
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(network_error)?;

        read_envelope(response).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn ingest(&self, payload: &FilePayload) -> Result<IngestResponse, TransportError> {
        let url = self.endpoint("upload")?;
        debug!(
            "POST {url} ({} bytes as '{}')",
            payload.bytes.len(),
            payload.file_name
        );

        let part = Part::bytes(payload.bytes.clone()).file_name(payload.file_name.clone());
        let form = Form::new().part(self.upload_field.clone(), part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;

        read_envelope(response).await
    }

    async fn train(&self, request: &TrainRequest) -> Result<TrainResponse, TransportError> {
        self.post_json("train", request).await
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError> {
        self.post_json("predict", request).await
    }
}

/// Parse and validate a configured base URL.
pub fn parse_base_url(raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        key: "server.base_url".to_string(),
        reason: format!("'{raw}' is not a valid URL: {e}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            key: "server.base_url".to_string(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn network_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Network(format!("request timed out: {err}"))
    } else {
        TransportError::Network(err.to_string())
    }
}

async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TransportError> {
    let status = response.status();
    let body = response.bytes().await.map_err(network_error)?;
    parse_envelope(status, &body)
}

/// Split a response into its success shape or a service error.
///
/// Non-success bodies are expected to be `{"error": "..."}`; anything else
/// falls back to the status line so no failure goes unreported.
pub fn parse_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, TransportError> {
    if status.is_success() {
        return serde_json::from_slice(body)
            .map_err(|e| TransportError::Decode(format!("unexpected response body: {e}")));
    }

    let message = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) if !error.is_empty() => error,
        _ => format!("Service returned {status}"),
    };
    warn!("service error ({status}): {message}");

    Err(TransportError::Service {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_success() {
        let body = br#"{"prediction": 85.0}"#;
        let response: PredictResponse = parse_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(response.prediction, 85.0);
    }

    #[test]
    fn test_parse_envelope_service_error_verbatim() {
        let body = br#"{"error": "Invalid input value"}"#;
        let result: Result<PredictResponse, _> = parse_envelope(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            result.unwrap_err(),
            TransportError::Service {
                status: 400,
                message: "Invalid input value".to_string()
            }
        );
    }

    #[test]
    fn test_parse_envelope_error_without_json_body() {
        let result: Result<PredictResponse, _> =
            parse_envelope(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        match result.unwrap_err() {
            TransportError::Service { status, message } => {
                assert_eq!(status, 502);
                assert!(message.contains("502"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_envelope_malformed_success_body() {
        let result: Result<TrainResponse, _> = parse_envelope(StatusCode::OK, br#"{"m": "steep"}"#);
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = Url::parse("http://localhost:5000/api").unwrap();
        let transport = HttpTransport::new(url, "file", None).unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:5000/api/");
        assert_eq!(
            transport.endpoint("train").unwrap().as_str(),
            "http://localhost:5000/api/train"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("http://127.0.0.1:5000").is_ok());
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(parse_base_url("not a url").is_err());
    }
}
