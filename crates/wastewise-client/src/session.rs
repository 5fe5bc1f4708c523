//! Session Store
//!
//! Holds the signed-in user's tokens, mirrors them to storage and tells
//! subscribers when the session starts, rotates or ends.
//!
//! Lifecycle: `new` -> `init` (restore from storage) -> `establish` /
//! `apply_refresh` -> `clear`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::models::{LoginResponse, RefreshResponse, Role, User};
use crate::single_flight::Latch;
use crate::storage::KeyValueStorage;

pub const ACCESS_TOKEN_KEY: &str = "wastewise.accessToken";
pub const REFRESH_TOKEN_KEY: &str = "wastewise.refreshToken";
pub const USER_KEY: &str = "wastewise.user";
pub const REFRESH_EXPIRES_AT_KEY: &str = "wastewise.refreshExpiresAt";

pub const SESSION_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_KEY,
    REFRESH_EXPIRES_AT_KEY,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// User clicked "sign out"
    UserRequested,
    /// A 403 on an API call
    Forbidden,
    /// Access token expired and could not be refreshed
    RefreshFailed,
}

impl LogoutReason {
    pub fn is_forced(self) -> bool {
        !matches!(self, LogoutReason::UserRequested)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoggedIn(User),
    Refreshed,
    UserUpdated(User),
    LoggedOut,
    ForcedLogout(LogoutReason),
}

pub type Subscription = u64;

type Listener = Rc<dyn Fn(&SessionEvent)>;

pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
    current: RefCell<Option<Session>>,
    listeners: RefCell<Vec<(Subscription, Listener)>>,
    next_subscription: Cell<Subscription>,
    forced_logout: Latch,
    initialized: Cell<bool>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            current: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            forced_logout: Latch::new(),
            initialized: Cell::new(false),
        }
    }

    /// Restore a persisted session. Safe to call more than once.
    pub fn init(&self) {
        if self.initialized.replace(true) {
            return;
        }

        let access = self.storage.get(ACCESS_TOKEN_KEY);
        let refresh = self.storage.get(REFRESH_TOKEN_KEY);
        let user_json = self.storage.get(USER_KEY);

        let (Some(access_token), Some(refresh_token), Some(user_json)) = (access, refresh, user_json) else {
            tracing::debug!("no persisted session");
            return;
        };

        let user = match serde_json::from_str::<User>(&user_json) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "persisted user is corrupt, discarding session");
                self.remove_keys();
                return;
            }
        };

        let refresh_expires_at = self
            .storage
            .get(REFRESH_EXPIRES_AT_KEY)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|t| t.with_timezone(&Utc));

        tracing::info!(user_id = user.id, role = ?user.role, "session restored");
        *self.current.borrow_mut() = Some(Session {
            access_token,
            refresh_token,
            refresh_expires_at,
            user,
        });
    }

    /// Start a session from a successful login
    pub fn establish(&self, login: LoginResponse) {
        let session = Session {
            access_token: login.access_token,
            refresh_token: login.refresh_token,
            refresh_expires_at: login.refresh_expires_at,
            user: login.user,
        };
        self.persist(&session);
        let user = session.user.clone();
        *self.current.borrow_mut() = Some(session);
        self.forced_logout.reset();
        self.initialized.set(true);
        tracing::info!(user_id = user.id, role = ?user.role, "signed in");
        self.emit(&SessionEvent::LoggedIn(user));
    }

    /// Rotate tokens. Returns false when there is no session to update.
    pub fn apply_refresh(&self, refresh: RefreshResponse) -> bool {
        let updated = {
            let mut current = self.current.borrow_mut();
            let Some(session) = current.as_mut() else {
                return false;
            };
            session.access_token = refresh.access_token;
            if let Some(token) = refresh.refresh_token {
                session.refresh_token = token;
            }
            if refresh.refresh_expires_at.is_some() {
                session.refresh_expires_at = refresh.refresh_expires_at;
            }
            session.clone()
        };
        self.persist(&updated);
        self.emit(&SessionEvent::Refreshed);
        true
    }

    pub fn update_user(&self, user: User) {
        let updated = {
            let mut current = self.current.borrow_mut();
            let Some(session) = current.as_mut() else {
                return;
            };
            session.user = user.clone();
            session.clone()
        };
        self.persist(&updated);
        self.emit(&SessionEvent::UserUpdated(user));
    }

    /// Drop the session and its persisted keys
    ///
    /// Forced logouts emit `ForcedLogout` at most once per session, and
    /// never after the session is already gone: a 401 or 403 that lands
    /// after the user signed out stays silent until the next `establish`.
    pub fn clear(&self, reason: LogoutReason) {
        let had_session = self.current.borrow_mut().take().is_some();
        self.remove_keys();
        let first_clear = self.forced_logout.trip();

        if !reason.is_forced() {
            tracing::info!("signed out");
            self.emit(&SessionEvent::LoggedOut);
        } else if had_session && first_clear {
            tracing::warn!(?reason, "forced logout");
            self.emit(&SessionEvent::ForcedLogout(reason));
        } else {
            tracing::debug!(?reason, "late auth failure after session ended");
        }
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.refresh_token.clone())
    }

    pub fn refresh_expires_at(&self) -> Option<DateTime<Utc>> {
        self.current.borrow().as_ref().and_then(|s| s.refresh_expires_at)
    }

    pub fn user(&self) -> Option<User> {
        self.current.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.current.borrow().as_ref().map(|s| s.user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// True when the refresh token has a known expiry at or before `now`
    pub fn refresh_expired(&self, now: DateTime<Utc>) -> bool {
        self.refresh_expires_at().is_some_and(|expiry| expiry <= now)
    }

    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) -> Subscription {
        let id = self.next_subscription.get() + 1;
        self.next_subscription.set(id);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: Subscription) {
        self.listeners.borrow_mut().retain(|(sub, _)| *sub != id);
    }

    fn emit(&self, event: &SessionEvent) {
        // Listeners may read the store or (un)subscribe while handling.
        let listeners: Vec<Listener> = self.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(event);
        }
    }

    fn persist(&self, session: &Session) {
        self.storage.set(ACCESS_TOKEN_KEY, &session.access_token);
        self.storage.set(REFRESH_TOKEN_KEY, &session.refresh_token);
        match serde_json::to_string(&session.user) {
            Ok(json) => self.storage.set(USER_KEY, &json),
            Err(e) => tracing::error!(error = %e, "failed to serialize user"),
        }
        match session.refresh_expires_at {
            Some(expiry) => self.storage.set(REFRESH_EXPIRES_AT_KEY, &expiry.to_rfc3339()),
            None => self.storage.remove(REFRESH_EXPIRES_AT_KEY),
        }
    }

    fn remove_keys(&self) {
        for key in SESSION_KEYS {
            self.storage.remove(key);
        }
    }
}
