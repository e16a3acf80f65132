//! Data models for Internal Sea Core API entities.
//!
//! - `User`, `UserUpdate`: the authenticated identity and profile edits
//! - `Item`, `ItemCreate`: the items collection
//! - `Organization`: organizations listed on the settings view
//! - `DashboardStats`: counts derived from users and items

pub mod dashboard;
pub mod item;
pub mod organization;
pub mod timestamp;
pub mod user;

use serde::Deserialize;

pub use dashboard::{DashboardStats, RECENT_ITEMS_LIMIT};
pub use item::{Item, ItemCreate};
pub use organization::Organization;
pub use user::{User, UserUpdate};

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Error body returned by the backend, e.g. `{"detail": "Incorrect email or password"}`.
/// Validation failures carry a list of objects in `detail` instead of a string.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(entries) => entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
