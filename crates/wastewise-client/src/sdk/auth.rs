//! Auth endpoints
//!
//! Credential exchange plus the session bookkeeping that goes with it.

use serde_json::json;

use crate::error::ApiResult;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::session::LogoutReason;
use crate::transport::ApiRequest;
use crate::ApiClient;

pub async fn register(client: &ApiClient, request: &RegisterRequest) -> ApiResult<User> {
    let body = serde_json::to_value(request).map_err(|e| crate::ApiError::Encode(e.to_string()))?;
    client
        .execute(ApiRequest::post("/auth/register").credential().json(body))
        .await
}

/// Exchange credentials for a token pair and start the session
pub async fn login(client: &ApiClient, email: &str, password: &str) -> ApiResult<User> {
    let body = serde_json::to_value(LoginRequest { email, password })
        .map_err(|e| crate::ApiError::Encode(e.to_string()))?;
    let response: LoginResponse = client
        .execute(ApiRequest::post("/auth/login").credential().json(body))
        .await?;
    let user = response.user.clone();
    client.session().establish(response);
    Ok(user)
}

/// Force a token rotation through the shared refresh flight
pub async fn refresh(client: &ApiClient) -> ApiResult<()> {
    client.refresh_access_token().await.map(|_| ())
}

/// Revoke the refresh token server-side, then drop the local session
///
/// The local session is cleared even when the server call fails.
pub async fn logout(client: &ApiClient) {
    if let Some(refresh_token) = client.session().refresh_token() {
        let request = ApiRequest::post("/auth/logout")
            .credential()
            .json(json!({ "refreshToken": refresh_token }));
        if let Err(error) = client.execute_unit(request).await {
            tracing::warn!(%error, "server-side logout failed");
        }
    }
    client.session().clear(LogoutReason::UserRequested);
}

/// Who am I; refreshes the stored user as a side effect
pub async fn me(client: &ApiClient) -> ApiResult<User> {
    let user: User = client.get("/auth/me").await?;
    client.session().update_user(user.clone());
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockReply, MockTransport};
    use crate::models::Role;
    use crate::sdk::test_support::{client_as, json_body, user};
    use crate::session::{SessionStore, SESSION_KEYS};
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use std::rc::Rc;

    fn anonymous(handler: impl Fn(&ApiRequest, Option<&str>) -> MockReply + 'static)
        -> (ApiClient, Rc<MockTransport>, Rc<MemoryStorage>)
    {
        let transport = Rc::new(MockTransport::new(handler));
        let storage = Rc::new(MemoryStorage::new());
        let session = Rc::new(SessionStore::new(storage.clone()));
        session.init();
        (ApiClient::new(transport.clone(), session), transport, storage)
    }

    #[tokio::test]
    async fn test_login_persists_session_across_reload() {
        let (client, transport, storage) = anonymous(|_, _| {
            MockReply::ok(serde_json::json!({
                "accessToken": "A",
                "refreshToken": "B",
                "user": { "id": 1, "email": "admin@example.com", "role": "ADMIN" }
            }))
        });

        let user = login(&client, "admin@example.com", "secret123").await.unwrap();
        assert_eq!(user.role, Role::Admin);

        let sent = json_body(&transport.calls()[0].body);
        assert_eq!(sent, serde_json::json!({ "email": "admin@example.com", "password": "secret123" }));

        let reloaded = SessionStore::new(storage.clone());
        reloaded.init();
        assert_eq!(reloaded.access_token().as_deref(), Some("A"));
        assert_eq!(reloaded.refresh_token().as_deref(), Some("B"));
        assert_eq!(reloaded.role(), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_login_rejected_leaves_no_session() {
        let (client, _, storage) = anonymous(|_, _| {
            MockReply::status(401, serde_json::json!({ "message": "Invalid credentials" }))
        });

        let err = login(&client, "admin@example.com", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!client.session().is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let (client, transport) = client_as(Role::Citizen, |_, _| {
            MockReply::status(500, serde_json::json!({}))
        });

        logout(&client).await;

        assert_eq!(transport.calls_to("/auth/logout"), 1);
        assert_eq!(json_body(&transport.calls()[0].body), serde_json::json!({ "refreshToken": "ref" }));
        assert!(!client.session().is_authenticated());
        // next authenticated call never leaves the client
        let err = me(&client).await.unwrap_err();
        assert_eq!(err, crate::ApiError::NotAuthenticated);
        assert_eq!(transport.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_logout_removes_every_storage_key() {
        let transport = Rc::new(MockTransport::new(|_, _| MockReply::empty(204)));
        let storage = Rc::new(MemoryStorage::new());
        let session = Rc::new(SessionStore::new(storage.clone()));
        session.establish(crate::models::LoginResponse {
            access_token: "A".into(),
            refresh_token: "B".into(),
            refresh_expires_at: Some(chrono::Utc::now()),
            user: user(Role::Crew),
        });
        let client = ApiClient::new(transport, session);

        logout(&client).await;
        for key in SESSION_KEYS {
            assert!(storage.get(key).is_none(), "{key} survived logout");
        }
    }

    #[tokio::test]
    async fn test_me_updates_stored_user() {
        let (client, _) = client_as(Role::Citizen, |_, _| {
            MockReply::ok(serde_json::json!({
                "id": 11, "email": "someone@example.com", "name": "Renamed", "role": "CITIZEN"
            }))
        });
        let fresh = me(&client).await.unwrap();
        assert_eq!(fresh.display_name(), "Renamed");
        assert_eq!(client.session().user().unwrap().name.as_deref(), Some("Renamed"));
    }
}
