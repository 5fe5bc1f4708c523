//! WasteWise API Client
//!
//! Everything the console needs to talk to the WasteWise backend:
//! - config: base URL and request ceiling
//! - session: persisted tokens with an explicit lifecycle
//! - client: bearer injection, single-flight refresh, forced logout
//! - sdk: one function per backend endpoint, grouped by role
//!
//! The client is single-threaded (`Rc`, `?Send` futures) to match the
//! browser event loop it runs on.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sdk;
pub mod session;
pub mod single_flight;
pub mod storage;
pub mod transport;

#[cfg(test)]
mod mock;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use session::{LogoutReason, Session, SessionEvent, SessionStore};
pub use storage::{KeyValueStorage, MemoryStorage};
pub use transport::{ApiRequest, HttpTransport, UploadFile};

#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
