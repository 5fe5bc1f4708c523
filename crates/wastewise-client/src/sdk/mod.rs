//! Domain SDK
//!
//! One thin function per backend endpoint, grouped by role. No retries or
//! caching here: auth recovery lives in [`crate::ApiClient`] and list
//! caching in the console's resources.

pub mod admin;
pub mod auth;
pub mod citizen;
pub mod crew;
pub mod ops;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// RFC 3986 unreserved characters stay as they are
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a caller-supplied path segment
pub(crate) fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use crate::mock::{MockReply, MockTransport};
    use crate::models::{LoginResponse, Role, User};
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;
    use crate::transport::{ApiRequest, Body};
    use crate::ApiClient;

    pub fn user(role: Role) -> User {
        User {
            id: 11,
            email: "someone@example.com".to_string(),
            name: Some("Someone".to_string()),
            role,
            phone: None,
            zone_id: Some(3),
            active: true,
        }
    }

    /// Client signed in as `role`, backed by `handler`
    pub fn client_as(
        role: Role,
        handler: impl Fn(&ApiRequest, Option<&str>) -> MockReply + 'static,
    ) -> (ApiClient, Rc<MockTransport>) {
        let transport = Rc::new(MockTransport::new(handler));
        let session = Rc::new(SessionStore::new(Rc::new(MemoryStorage::new())));
        session.establish(LoginResponse {
            access_token: "tok".to_string(),
            refresh_token: "ref".to_string(),
            refresh_expires_at: None,
            user: user(role),
        });
        (ApiClient::new(transport.clone(), session), transport)
    }

    pub fn json_body(body: &Body) -> serde_json::Value {
        match body {
            Body::Json(value) => value.clone(),
            other => panic!("expected JSON body, got {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("PAY-2024_01.x~y"), "PAY-2024_01.x~y");
        assert_eq!(segment("a/b c?"), "a%2Fb%20c%3F");
    }
}
