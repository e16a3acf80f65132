use serde::Serialize;

use super::{Item, User};

/// Number of items shown in the dashboard's "recent" list
pub const RECENT_ITEMS_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_items: usize,
    pub recent_items: Vec<Item>,
}

impl DashboardStats {
    /// Summarize the two collections. Recent items keep server order.
    pub fn from_collections(users: &[User], items: Vec<Item>) -> Self {
        let total_items = items.len();
        let recent_items = items.into_iter().take(RECENT_ITEMS_LIMIT).collect();
        Self {
            total_users: users.len(),
            total_items,
            recent_items,
        }
    }
}
