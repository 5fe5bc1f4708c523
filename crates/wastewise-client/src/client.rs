//! Authenticated API Client
//!
//! Every SDK call goes through [`ApiClient::execute`], which attaches the
//! session's bearer token and recovers from an expired access token:
//!
//! - 401 on a bearer request: refresh once (shared by all concurrent 401s)
//!   and replay the request once. If the refresh fails the session is
//!   cleared and the original 401 is returned.
//! - 403 on a bearer request: forced logout, no refresh.
//! - Anything else is handed back to the caller untouched.

use std::rc::Rc;

use chrono::Utc;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::error::{unwrap_envelope, ApiError, ApiResult};
use crate::models::RefreshResponse;
use crate::session::{LogoutReason, SessionStore};
use crate::single_flight::SingleFlight;
use crate::storage::KeyValueStorage;
use crate::transport::{ApiRequest, AuthMode, FormPart, HttpTransport, ReqwestTransport};

pub const REFRESH_PATH: &str = "/auth/refresh";

struct Inner {
    transport: Rc<dyn HttpTransport>,
    session: Rc<SessionStore>,
    refresh: SingleFlight<ApiResult<String>>,
}

/// Shared handle; clones talk to the same session and refresh flight
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<Inner>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn HttpTransport>, session: Rc<SessionStore>) -> Self {
        Self {
            inner: Rc::new(Inner {
                transport,
                session,
                refresh: SingleFlight::new(),
            }),
        }
    }

    /// Client over `reqwest` with a session restored from `storage`
    pub fn from_config(config: ClientConfig, storage: Rc<dyn KeyValueStorage>) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(config)?;
        let session = Rc::new(SessionStore::new(storage));
        session.init();
        Ok(Self::new(Rc::new(transport), session))
    }

    pub fn session(&self) -> &Rc<SessionStore> {
        &self.inner.session
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_in_flight()
    }

    // ========================
    // Verbs
    // ========================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn get_with<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let request = query
            .iter()
            .fold(ApiRequest::get(path), |req, (key, value)| req.query(*key, value));
        self.execute(request).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.execute(ApiRequest::post(path).json(encode(body)?)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.execute(ApiRequest::new(reqwest::Method::PUT, path).json(encode(body)?))
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.execute(ApiRequest::new(reqwest::Method::PATCH, path).json(encode(body)?))
            .await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute_unit(ApiRequest::new(reqwest::Method::DELETE, path)).await
    }

    /// `multipart/form-data` POST
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, parts: Vec<FormPart>) -> ApiResult<T> {
        self.execute(ApiRequest::post(path).multipart(parts)).await
    }

    pub async fn execute_unit(&self, request: ApiRequest) -> ApiResult<()> {
        self.execute::<IgnoredAny>(request).await.map(|_| ())
    }

    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let value = self.execute_value(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    // ========================
    // State machine
    // ========================

    pub async fn execute_value(&self, mut request: ApiRequest) -> ApiResult<Value> {
        let mut bearer = match request.auth {
            AuthMode::Bearer => Some(self.inner.session.access_token().ok_or_else(|| {
                tracing::debug!(path = %request.path, "rejected before sending: no session");
                ApiError::NotAuthenticated
            })?),
            AuthMode::Credential => self.inner.session.access_token(),
        };

        loop {
            tracing::debug!(method = %request.method, path = %request.path, retried = request.retried, "api request");
            let response = self.inner.transport.send(&request, bearer.as_deref()).await?;
            if response.is_success() {
                return decode_body(&response.body);
            }

            let error = ApiError::from_status(response.status, &response.body);
            if request.auth == AuthMode::Credential {
                return Err(error);
            }

            match response.status {
                401 if !request.retried => match self.token_after_unauthorized(bearer.as_deref()).await {
                    Ok(fresh) => {
                        request.retried = true;
                        bearer = Some(fresh);
                    }
                    Err(_) => return Err(error),
                },
                403 => {
                    tracing::warn!(path = %request.path, "403 from api, ending session");
                    self.inner.session.clear(LogoutReason::Forbidden);
                    return Err(error);
                }
                _ => return Err(error),
            }
        }
    }

    /// Token to replay a request with after it got a 401
    ///
    /// If a refresh already rotated the token since `sent_with` went out,
    /// use the new one; otherwise join (or start) the refresh flight.
    async fn token_after_unauthorized(&self, sent_with: Option<&str>) -> ApiResult<String> {
        if let Some(current) = self.inner.session.access_token() {
            if Some(current.as_str()) != sent_with {
                return Ok(current);
            }
        }
        self.refresh_access_token().await
    }

    /// Rotate the access token, sharing one refresh call among all callers
    pub async fn refresh_access_token(&self) -> ApiResult<String> {
        let transport = self.inner.transport.clone();
        let session = self.inner.session.clone();
        self.inner
            .refresh
            .run(move || refresh_tokens(transport, session))
            .await
    }
}

async fn refresh_tokens(transport: Rc<dyn HttpTransport>, session: Rc<SessionStore>) -> ApiResult<String> {
    let Some(refresh_token) = session.refresh_token() else {
        tracing::warn!("no refresh token, cannot recover from 401");
        session.clear(LogoutReason::RefreshFailed);
        return Err(ApiError::NotAuthenticated);
    };
    if session.refresh_expired(Utc::now()) {
        tracing::warn!("refresh token expired");
        session.clear(LogoutReason::RefreshFailed);
        return Err(ApiError::Unauthorized {
            message: Some("Your session has expired. Please sign in again.".to_string()),
        });
    }

    let request = ApiRequest::post(REFRESH_PATH)
        .credential()
        .json(json!({ "refreshToken": refresh_token }));

    let outcome = async {
        let response = transport.send(&request, None).await?;
        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        let value = decode_body(&response.body)?;
        serde_json::from_value::<RefreshResponse>(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
    .await;

    match outcome {
        Ok(rotated) => {
            let token = rotated.access_token.clone();
            if !session.apply_refresh(rotated) {
                // signed out while the refresh was running
                return Err(ApiError::NotAuthenticated);
            }
            tracing::info!("access token refreshed");
            Ok(token)
        }
        Err(error) => {
            tracing::warn!(%error, "token refresh failed");
            session.clear(LogoutReason::RefreshFailed);
            Err(error)
        }
    }
}

fn decode_body(body: &[u8]) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    let value = serde_json::from_slice::<Value>(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(unwrap_envelope(value))
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockReply, MockTransport};
    use crate::models::{LoginResponse, Role, User};
    use crate::session::{SessionEvent, SESSION_KEYS};
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;

    struct Harness {
        client: ApiClient,
        transport: Rc<MockTransport>,
        storage: Rc<MemoryStorage>,
        events: Rc<RefCell<Vec<SessionEvent>>>,
    }

    fn signed_in(transport: MockTransport) -> Harness {
        let transport = Rc::new(transport);
        let storage = Rc::new(MemoryStorage::new());
        let session = Rc::new(SessionStore::new(storage.clone()));
        session.establish(LoginResponse {
            access_token: "old".to_string(),
            refresh_token: "R".to_string(),
            refresh_expires_at: None,
            user: User {
                id: 1,
                email: "admin@example.com".to_string(),
                name: None,
                role: Role::Admin,
                phone: None,
                zone_id: None,
                active: true,
            },
        });
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        session.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        Harness {
            client: ApiClient::new(transport.clone(), session),
            transport,
            storage,
            events,
        }
    }

    fn forced_logouts(events: &RefCell<Vec<SessionEvent>>) -> usize {
        events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SessionEvent::ForcedLogout(_)))
            .count()
    }

    /// 401 for the stale token, 200 for the refreshed one
    fn expiring_backend(refresh: fn() -> MockReply) -> MockTransport {
        MockTransport::new(move |req, bearer| {
            if req.path == REFRESH_PATH {
                return refresh().after_yields(3);
            }
            match bearer {
                Some("new") => MockReply::ok(json!({ "data": { "path": req.path } })),
                _ => MockReply::status(401, json!({ "message": "Token expired" })).after_yields(1),
            }
        })
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let h = signed_in(expiring_backend(|| MockReply::ok(json!({ "accessToken": "new" }))));

        let requests = (0..5).map(|i| {
            let client = h.client.clone();
            async move { client.get::<Value>(&format!("/admin/zones/{i}")).await }
        });
        let results = futures::future::join_all(requests).await;

        assert_eq!(h.transport.calls_to(REFRESH_PATH), 1);
        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap(), json!({ "path": format!("/admin/zones/{i}") }));
        }
        assert_eq!(h.client.session().access_token().as_deref(), Some("new"));
        assert_eq!(h.client.session().refresh_token().as_deref(), Some("R"));
        assert!(!h.client.is_refreshing());
    }

    #[tokio::test]
    async fn test_failed_refresh_fails_every_waiter_with_original_error() {
        let h = signed_in(expiring_backend(|| {
            MockReply::status(401, json!({ "message": "Refresh token revoked" }))
        }));

        let requests = (0..4).map(|_| {
            let client = h.client.clone();
            async move { client.get::<Value>("/ops/tasks").await }
        });
        let results = futures::future::join_all(requests).await;

        assert_eq!(h.transport.calls_to(REFRESH_PATH), 1);
        for result in results {
            assert_eq!(
                result.unwrap_err(),
                ApiError::Unauthorized { message: Some("Token expired".to_string()) }
            );
        }
        assert!(!h.client.session().is_authenticated());
        assert!(h.storage.is_empty());
        assert_eq!(forced_logouts(&h.events), 1);
    }

    #[tokio::test]
    async fn test_403_forces_logout_without_refresh() {
        let h = signed_in(MockTransport::new(|req, _| {
            if req.path == REFRESH_PATH {
                MockReply::ok(json!({ "accessToken": "new" }))
            } else {
                MockReply::status(403, json!({ "message": "Role revoked" }))
            }
        }));

        let err = h.client.get::<Value>("/admin/users").await.unwrap_err();

        assert_eq!(err, ApiError::Forbidden { message: Some("Role revoked".to_string()) });
        assert_eq!(h.transport.calls_to(REFRESH_PATH), 0);
        assert!(!h.client.session().is_authenticated());
        for key in SESSION_KEYS {
            assert!(h.storage.get(key).is_none());
        }
        assert!(h
            .events
            .borrow()
            .contains(&SessionEvent::ForcedLogout(LogoutReason::Forbidden)));
    }

    #[tokio::test]
    async fn test_second_401_after_retry_is_not_retried() {
        let h = signed_in(MockTransport::new(|req, _| {
            if req.path == REFRESH_PATH {
                MockReply::ok(json!({ "accessToken": "new", "refreshToken": "R2" }))
            } else {
                MockReply::status(401, json!({}))
            }
        }));

        let err = h.client.get::<Value>("/crew/tasks").await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(h.transport.calls_to(REFRESH_PATH), 1);
        assert_eq!(h.transport.calls_to("/crew/tasks"), 2);
        let bearers: Vec<_> = h
            .transport
            .calls()
            .into_iter()
            .filter(|c| c.path == "/crew/tasks")
            .map(|c| c.bearer)
            .collect();
        assert_eq!(bearers, vec![Some("old".to_string()), Some("new".to_string())]);
        // the refresh itself succeeded, so the session survives
        assert_eq!(h.client.session().refresh_token().as_deref(), Some("R2"));
    }

    #[tokio::test]
    async fn test_signed_out_requests_are_never_sent() {
        let h = signed_in(MockTransport::new(|_, _| MockReply::ok(json!({}))));
        h.client.session().clear(LogoutReason::UserRequested);

        let err = h.client.get::<Value>("/citizen/wallet").await.unwrap_err();

        assert_eq!(err, ApiError::NotAuthenticated);
        assert_eq!(h.transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_401_landing_after_sign_out_does_not_force_logout() {
        let h = signed_in(MockTransport::new(|_, _| {
            MockReply::status(401, json!({ "message": "Token expired" })).after_yields(3)
        }));

        let request = h.client.get::<Value>("/admin/zones");
        let sign_out = async {
            tokio::task::yield_now().await;
            h.client.session().clear(LogoutReason::UserRequested);
        };
        let (result, ()) = futures::future::join(request, sign_out).await;

        assert!(result.unwrap_err().is_unauthorized());
        assert_eq!(h.transport.calls_to(REFRESH_PATH), 0);
        assert_eq!(forced_logouts(&h.events), 0);
        assert_eq!(*h.events.borrow(), vec![SessionEvent::LoggedOut]);
    }

    #[tokio::test]
    async fn test_credential_requests_skip_interception() {
        let h = signed_in(MockTransport::new(|_, _| {
            MockReply::status(401, json!({ "message": "Invalid credentials" }))
        }));

        let err = h
            .client
            .execute_value(ApiRequest::post("/auth/login").credential())
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(h.transport.calls_to(REFRESH_PATH), 0);
        assert!(h.client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_other_failures_pass_through() {
        let h = signed_in(MockTransport::new(|req, _| match req.path.as_str() {
            "/ops/routes" => MockReply::status(500, json!({ "error": "Route engine down" })),
            _ => MockReply::fail(ApiError::Network("connection refused".to_string())),
        }));

        let err = h.client.get::<Value>("/ops/routes").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "Route engine down");

        let err = h.client.get::<Value>("/ops/cases").await.unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".to_string()));
        assert!(h.client.session().is_authenticated());
        assert_eq!(h.transport.calls_to(REFRESH_PATH), 0);
    }

    #[tokio::test]
    async fn test_expired_refresh_token_fails_without_network() {
        let h = signed_in(MockTransport::new(|_, _| MockReply::status(401, json!({}))));
        h.client.session().apply_refresh(RefreshResponse {
            access_token: "old".to_string(),
            refresh_token: None,
            refresh_expires_at: Some(Utc::now() - chrono::Duration::minutes(5)),
        });

        let err = h.client.get::<Value>("/citizen/invoices").await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(h.transport.calls_to(REFRESH_PATH), 0);
        assert!(!h.client.session().is_authenticated());
        assert_eq!(forced_logouts(&h.events), 1);
    }

    #[tokio::test]
    async fn test_empty_success_body_decodes_as_unit() {
        let h = signed_in(MockTransport::new(|_, _| MockReply::empty(204)));
        h.client.delete("/admin/zones/4").await.unwrap();
        let calls = h.transport.calls();
        assert_eq!(calls[0].method, reqwest::Method::DELETE);
        assert_eq!(calls[0].bearer.as_deref(), Some("old"));
    }
}
