//! Authentication module for managing the user session and its bearer token.
//!
//! This module provides:
//! - `SessionStore`: login/logout/restore and the `LoggedOut`/`LoggedIn`/`Expired` states
//! - `TokenStore`: the durable slot holding the token, backed by a file,
//!   the OS keychain (`KeyringTokenStore`) or memory
//!
//! Tokens are opaque; expiry is only learned from the backend rejecting one.

pub mod credentials;
pub mod error;
pub mod session;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use error::AuthError;
pub use session::{Credential, Session, SessionState, SessionStore};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_SLOT};
