//! Plain-text rendering of API data for the terminal.

use std::fmt::Write;

use seaport_core::models::{DashboardStats, Item, Organization, User};

use crate::utils::{format_date, format_optional, truncate_string};

/// Column width for item titles and organization names
const NAME_WIDTH: usize = 30;

/// Column width for descriptions
const DESCRIPTION_WIDTH: usize = 40;

pub fn user(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", user.display_name(), user.email);
    let _ = writeln!(out, "  id:       {}", user.id);
    let _ = writeln!(out, "  active:   {}", if user.is_active { "yes" } else { "no" });
    if user.is_superuser {
        let _ = writeln!(out, "  role:     superuser");
    }
    let _ = writeln!(out, "  created:  {}", format_date(Some(&user.created_at)));
    if user.updated_at.is_some() {
        let _ = writeln!(out, "  updated:  {}", format_date(user.updated_at.as_ref()));
    }
    out
}

pub fn items(items: &[Item]) -> String {
    if items.is_empty() {
        return "No items found. Create your first item!\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<NAME_WIDTH$}  {:<DESCRIPTION_WIDTH$}  {}",
        "ID", "TITLE", "DESCRIPTION", "CREATED"
    );
    for item in items {
        let _ = writeln!(
            out,
            "{:>6}  {:<NAME_WIDTH$}  {:<DESCRIPTION_WIDTH$}  {}",
            item.id,
            truncate_string(&item.title, NAME_WIDTH),
            truncate_string(item.description_display(), DESCRIPTION_WIDTH),
            format_date(item.created_at.as_ref()),
        );
    }
    out
}

pub fn item(item: &Item) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", item.id, item.title);
    let _ = writeln!(out, "{}", format_optional(item.description.as_deref(), "(no description)"));
    let _ = writeln!(out, "Created: {}", format_date(item.created_at.as_ref()));
    out
}

pub fn dashboard(stats: &DashboardStats, user: Option<&User>) -> String {
    let mut out = String::new();
    if let Some(user) = user {
        let _ = writeln!(out, "Welcome back, {}!", user.display_name());
        out.push('\n');
    }
    let _ = writeln!(out, "Total users: {}", stats.total_users);
    let _ = writeln!(out, "Total items: {}", stats.total_items);
    out.push('\n');
    let _ = writeln!(out, "Recent items");
    if stats.recent_items.is_empty() {
        let _ = writeln!(out, "  No items found.");
    }
    for item in &stats.recent_items {
        let _ = writeln!(
            out,
            "  {}  {}  ({})",
            truncate_string(&item.title, NAME_WIDTH),
            truncate_string(item.description_display(), DESCRIPTION_WIDTH),
            format_date(item.created_at.as_ref()),
        );
    }
    out
}

pub fn organizations(orgs: &[Organization]) -> String {
    if orgs.is_empty() {
        return "No organizations found.\n".to_string();
    }
    let mut out = String::new();
    for org in orgs {
        let status = if org.is_active { "" } else { " [inactive]" };
        let _ = writeln!(
            out,
            "{:>6}  {:<NAME_WIDTH$}  {}{}",
            org.id,
            truncate_string(&org.name, NAME_WIDTH),
            org.contact_display(),
            status,
        );
    }
    out
}
