//! Core library for seaport, a client for the Internal Sea Core API.
//!
//! - [`api`]: the REST client and its error taxonomy
//! - [`auth`]: the session store and durable token storage
//! - [`context`]: the context object injected into every view
//! - [`models`]: users, items, organizations, dashboard stats
//! - [`config`]: persisted settings
//! - [`validate`]: local input checks

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod models;
pub mod validate;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, Credential, Session, SessionState, SessionStore, TokenStore};
pub use config::{Config, TokenStoreKind};
pub use context::{AppContext, ViewError};
pub use validate::ValidationError;
