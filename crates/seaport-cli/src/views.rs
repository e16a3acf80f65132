//! Subcommand implementations. Each view acts on the injected `AppContext`.

use std::io::{self, Write};

use anyhow::{Context, Result};
use seaport_core::auth::AuthError;
use seaport_core::config::Config;
use seaport_core::models::UserUpdate;
use seaport_core::{ApiError, AppContext, SessionState, ViewError};
use tracing::{info, warn};

use crate::render;

/// Exit status reported when the session is missing or expired
pub const EXIT_UNAUTHORIZED: u8 = 2;

/// Turn any view failure into a message fit for the terminal
pub fn user_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<AuthError>() {
        return auth_message(e);
    }
    if let Some(e) = err.downcast_ref::<ViewError>() {
        return match e {
            ViewError::Validation(v) => v.to_string(),
            ViewError::Api(api) => api_message(api),
        };
    }
    if let Some(e) = err.downcast_ref::<ApiError>() {
        return api_message(e);
    }
    format!("{:#}", err)
}

fn auth_message(err: &AuthError) -> String {
    match err {
        AuthError::Validation(v) => v.to_string(),
        AuthError::InvalidCredentials(detail) if detail.is_empty() => {
            "Invalid email or password".to_string()
        }
        AuthError::InvalidCredentials(detail) => format!("Login failed: {}", detail),
        AuthError::Network(e) if e.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        AuthError::Network(_) => {
            "Unable to connect to server. Check the API URL and your connection.".to_string()
        }
        AuthError::Server(_) => "The server failed to process the login. Please try again later.".to_string(),
        AuthError::Storage(e) => format!(
            "Login succeeded but the session could not be saved; you are not logged in: {:#}",
            e
        ),
        AuthError::Api(ApiError::Unauthorized) => {
            "The server issued a token but then rejected it. Please try logging in again.".to_string()
        }
        AuthError::Api(e) => api_message(e),
    }
}

fn api_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Session expired or missing. Please log in again.".to_string(),
        ApiError::NotFound(detail) => format!("Not found: {}", detail),
        ApiError::Rejected { detail, .. } => format!("Request rejected: {}", detail),
        ApiError::ServerError(_) => "The server encountered an error. Please try again later.".to_string(),
        ApiError::NetworkError(e) if e.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        ApiError::NetworkError(_) => {
            "Unable to connect to server. Check the API URL and your connection.".to_string()
        }
        ApiError::InvalidResponse(_) | ApiError::InvalidHeader(_) => {
            format!("Unexpected response from server: {}", err)
        }
    }
}

/// True when the failure means the user has to log in again
pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    if let Some(e) = err.downcast_ref::<ApiError>() {
        return e.is_unauthorized();
    }
    if let Some(e) = err.downcast_ref::<ViewError>() {
        return e.is_unauthorized();
    }
    false
}

fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(d) => print!("{} [{}]: ", label, d),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    Ok(match default {
        Some(d) if input.is_empty() => d.to_string(),
        _ => input.to_string(),
    })
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

// ============================================================================
// Authentication
// ============================================================================

pub async fn login(
    ctx: &mut AppContext,
    config: &mut Config,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => prompt("Email", config.last_email.as_deref())?,
    };
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let session = ctx.login(&email, &password).await?;

    config.last_email = Some(email.trim().to_string());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    match session.identity() {
        Some(user) => println!("Welcome back, {}!", user.display_name()),
        None => println!("Login successful."),
    }
    Ok(())
}

pub fn logout(ctx: &mut AppContext) -> Result<()> {
    let was_logged_in = ctx.session().is_authenticated();
    ctx.logout()?;
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub async fn whoami(ctx: &mut AppContext) -> Result<()> {
    match ctx.whoami().await? {
        Some(user) => print!("{}", render::user(&user)),
        None => println!("Not logged in. Run `seaport login` first."),
    }
    Ok(())
}

pub fn status(ctx: &AppContext, config: &Config) {
    let state = match ctx.session().state() {
        SessionState::LoggedOut => "logged out",
        SessionState::LoggedIn => "logged in (not yet verified)",
        SessionState::Expired => "expired",
    };
    let state = match ctx.session().current_user() {
        Some(user) => format!("logged in as {}", user.email),
        None => state.to_string(),
    };
    println!("API:         {}", ctx.api().base_url());
    println!("Token store: {}", config.token_store);
    println!("Session:     {}", state);
}

pub async fn update_profile(
    ctx: &mut AppContext,
    full_name: Option<String>,
    email: Option<String>,
    change_password: bool,
) -> Result<()> {
    let password = if change_password {
        let first = rpassword::prompt_password("New password: ").context("Failed to read password")?;
        let second = rpassword::prompt_password("Repeat new password: ").context("Failed to read password")?;
        if first != second {
            anyhow::bail!("Passwords do not match");
        }
        Some(first)
    } else {
        None
    };

    let update = UserUpdate {
        full_name,
        email,
        password,
    };
    let user = ctx.update_profile(&update).await?;
    println!("Profile updated.");
    print!("{}", render::user(&user));
    Ok(())
}

// ============================================================================
// Dashboard
// ============================================================================

pub async fn dashboard(ctx: &mut AppContext, json: bool) -> Result<()> {
    let stats = ctx.dashboard().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    // The greeting is optional; a failed lookup should not hide the counts
    let user = match ctx.whoami().await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Could not load user for greeting");
            None
        }
    };
    print!("{}", render::dashboard(&stats, user.as_ref()));
    Ok(())
}

// ============================================================================
// Items
// ============================================================================

pub async fn list_items(ctx: &mut AppContext, json: bool) -> Result<()> {
    let items = ctx.list_items().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print!("{}", render::items(&items));
    }
    Ok(())
}

pub async fn show_item(ctx: &mut AppContext, id: i64) -> Result<()> {
    let item = ctx.item(id).await?;
    print!("{}", render::item(&item));
    Ok(())
}

pub async fn create_item(ctx: &mut AppContext, title: &str, description: &str) -> Result<()> {
    let item = ctx.create_item(title, description).await?;
    println!("Created item #{}: {}", item.id, item.title);
    Ok(())
}

pub async fn delete_item(ctx: &mut AppContext, id: i64, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Are you sure you want to delete item #{}?", id))? {
        info!(item_id = id, "Delete cancelled");
        println!("Cancelled.");
        return Ok(());
    }
    ctx.delete_item(id).await?;
    println!("Deleted item #{}.", id);
    Ok(())
}

// ============================================================================
// Organizations
// ============================================================================

pub async fn organizations(ctx: &mut AppContext, json: bool) -> Result<()> {
    let orgs = ctx.organizations().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&orgs)?);
    } else {
        print!("{}", render::organizations(&orgs));
    }
    Ok(())
}
