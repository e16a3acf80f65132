use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Organization {
    /// Best single line of contact info, preferring email over phone over website
    pub fn contact_display(&self) -> String {
        self.email
            .as_ref()
            .or(self.phone.as_ref())
            .or(self.website.as_ref())
            .cloned()
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organization() {
        let json = r#"{"id":7,"name":"Harbor","description":null,"website":"https://harbor.example","email":null,"phone":"555-0100","address":null,"is_active":true,"created_at":"2024-01-01T00:00:00"}"#;
        let org: Organization = serde_json::from_str(json).expect("Failed to parse organization test JSON");
        assert_eq!(org.name, "Harbor");
        assert_eq!(org.contact_display(), "555-0100");
    }

    #[test]
    fn test_contact_display_none() {
        let json = r#"{"id":8,"name":"Quiet"}"#;
        let org: Organization = serde_json::from_str(json).expect("Failed to parse organization test JSON");
        assert!(org.is_active);
        assert_eq!(org.contact_display(), "-");
    }
}
