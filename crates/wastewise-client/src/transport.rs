//! HTTP Transport
//!
//! Request description shared by the client and the SDK, and the seam
//! (`HttpTransport`) that actually puts it on the wire.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Whether the request carries the session's bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Needs the access token; gets 401 refresh and 403 logout handling
    #[default]
    Bearer,
    /// Credential exchange (login, register, refresh, logout): sent as is
    Credential,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// File picked by the user, ready for a multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn into_part(self, field: &str) -> FormPart {
        FormPart::File {
            name: field.to_string(),
            file_name: self.file_name,
            mime: self.mime,
            bytes: self.bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
    pub auth: AuthMode,
    /// Set once the request has been replayed after a refresh
    pub retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            auth: AuthMode::Bearer,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Body::Multipart(parts);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn credential(mut self) -> Self {
        self.auth = AuthMode::Credential;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Puts one request on the wire. No retries, no auth logic.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse, ApiError>;
}

/// `reqwest`-backed transport (fetch on wasm32, hyper elsewhere)
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.timeout);
        let http = builder.build().map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<reqwest::RequestBuilder, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.config.endpoint(&request.path))
            .header(reqwest::header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };
        Ok(builder)
    }

    async fn dispatch(&self, builder: reqwest::RequestBuilder) -> Result<RawResponse, ApiError> {
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();
        Ok(RawResponse { status, body })
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse, ApiError> {
        let builder = self.build(request, bearer)?;
        with_timeout(self.config.timeout, self.dispatch(builder)).await
    }
}

fn multipart_form(parts: &[FormPart]) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File { name, file_name, mime, bytes } => {
                let file = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(|e| ApiError::Network(format!("invalid mime type `{mime}`: {e}")))?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

fn map_reqwest_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(error.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn with_timeout<F>(_ceiling: std::time::Duration, fut: F) -> Result<RawResponse, ApiError>
where
    F: std::future::Future<Output = Result<RawResponse, ApiError>>,
{
    // reqwest enforces the client-level timeout natively
    fut.await
}

#[cfg(target_arch = "wasm32")]
async fn with_timeout<F>(ceiling: std::time::Duration, fut: F) -> Result<RawResponse, ApiError>
where
    F: std::future::Future<Output = Result<RawResponse, ApiError>>,
{
    use futures::future::{select, Either};

    let millis = u32::try_from(ceiling.as_millis()).unwrap_or(u32::MAX);
    let timer = gloo_timers::future::TimeoutFuture::new(millis);
    futures::pin_mut!(fut);
    match select(fut, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(ApiError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::post("/auth/login")
            .credential()
            .json(json!({"email": "a@b.c"}))
            .query("x", 1);
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.auth, AuthMode::Credential);
        assert_eq!(req.query, vec![("x".to_string(), "1".to_string())]);
        assert!(!req.retried);
    }

    #[test]
    fn test_multipart_form_rejects_bad_mime() {
        let parts = vec![
            FormPart::text("note", "bin lid broken"),
            UploadFile {
                file_name: "proof.jpg".into(),
                mime: "not a mime".into(),
                bytes: vec![0xff, 0xd8],
            }
            .into_part("proof"),
        ];
        assert!(multipart_form(&parts[..1]).is_ok());
        assert!(matches!(multipart_form(&parts), Err(ApiError::Network(_))));
    }

    #[test]
    fn test_transport_builds_authorized_request() {
        let transport = ReqwestTransport::new(ClientConfig::default()).unwrap();
        let req = ApiRequest::get("/admin/zones").query("page", 2);
        let built = transport.build(&req, Some("tok")).unwrap().build().unwrap();
        assert_eq!(built.url().as_str(), "http://localhost:4000/api/admin/zones?page=2");
        assert_eq!(built.headers()["authorization"], "Bearer tok");
    }
}
