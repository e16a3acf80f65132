use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Body of `POST /items/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCreate {
    pub title: String,
    pub description: String,
}
