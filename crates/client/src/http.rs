//! HTTP transport shared by every store.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;

use fleetdesk_auth::CredentialProvider;
use fleetdesk_core::FormData;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// Whether a call carries the bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Bearer,
    /// Auth endpoints (register, login, password reset) never send one.
    Public,
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    /// Sent as `multipart/form-data`.
    Form(FormData),
}

impl Body {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> ApiResult<Self> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| ApiError::Parse(format!("failed to encode request body: {e}")))
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    status: u16,
    body: Vec<u8>,
}

impl Reply {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// `message` field of a JSON reply, if the server sent one.
    pub fn message(&self) -> Option<String> {
        server_message(&self.body)
    }
}

/// Thin wrapper over `reqwest` bound to one API base and one credential.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialProvider>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, credentials: Arc<CredentialProvider>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn credentials(&self) -> &Arc<CredentialProvider> {
        &self.credentials
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str, failure: &str) -> ApiResult<Reply> {
        self.send(Method::GET, path, Access::Bearer, Body::Empty, failure)
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        access: Access,
        body: Body,
        failure: &str,
    ) -> ApiResult<Reply> {
        self.send(Method::POST, path, access, body, failure).await
    }

    pub async fn put(&self, path: &str, body: Body, failure: &str) -> ApiResult<Reply> {
        self.send(Method::PUT, path, Access::Bearer, body, failure)
            .await
    }

    /// Issue one request. `failure` is the message used when a rejected
    /// response carries none of its own.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        access: Access,
        body: Body,
        failure: &str,
    ) -> ApiResult<Reply> {
        let req = self.request(method.clone(), path, access);
        let req = match body {
            Body::Empty => req,
            Body::Json(value) => req.json(&value),
            Body::Form(form) => req.multipart(multipart_form(form)?),
        };

        tracing::debug!(%method, path, "sending request");

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "request did not complete");
            ApiError::Transport(e.to_string())
        })?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_vec();

        if !status.is_success() {
            let message = server_message(&body).unwrap_or_else(|| failure.to_string());
            tracing::warn!(%method, path, status = status.as_u16(), %message, "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Reply {
            status: status.as_u16(),
            body,
        })
    }

    fn request(&self, method: Method, path: &str, access: Access) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match (access, self.credentials.get()) {
            (Access::Bearer, Some(token)) => req.bearer_auth(token),
            _ => req,
        }
    }
}

fn multipart_form(form: FormData) -> ApiResult<multipart::Form> {
    let (text, files) = form.into_parts();

    let mut out = multipart::Form::new();
    for (name, value) in text {
        out = out.text(name, value);
    }
    for (name, upload) in files {
        let mut part = multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(content_type) = upload.content_type {
            part = part.mime_str(&content_type).map_err(|e| {
                ApiError::Validation(format!("invalid content type {content_type:?}: {e}"))
            })?;
        }
        out = out.part(name, part);
    }
    Ok(out)
}

fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdesk_core::Upload;

    #[test]
    fn server_message_reads_json_message_only() {
        assert_eq!(
            server_message(br#"{"message":"Bunk already exists"}"#).as_deref(),
            Some("Bunk already exists")
        );
        assert_eq!(server_message(br#"{"message":"  "}"#), None);
        assert_eq!(server_message(br#"{"error":"bad"}"#), None);
        assert_eq!(server_message(b"<html>502</html>"), None);
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let config = ClientConfig::new("http://localhost:3000/api/");
        let api = ApiClient::new(&config, Arc::new(CredentialProvider::ephemeral())).unwrap();
        assert_eq!(api.url("/vehicles"), "http://localhost:3000/api/vehicles");
        assert_eq!(api.url("bunks"), "http://localhost:3000/api/bunks");
    }

    #[test]
    fn bad_content_type_is_caught_before_sending() {
        let form = FormData::new()
            .file("image", Upload::new("a.png", vec![1]).with_content_type("not a mime"));
        assert!(matches!(multipart_form(form), Err(ApiError::Validation(_))));
    }

    #[test]
    fn reply_decodes_or_reports_parse_error() {
        let reply = Reply {
            status: 200,
            body: b"[1,2]".to_vec(),
        };
        assert_eq!(reply.json::<Vec<i32>>().unwrap(), vec![1, 2]);
        assert!(matches!(
            reply.json::<String>(),
            Err(ApiError::Parse(_))
        ));
    }
}
