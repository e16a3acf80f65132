//! The context object handed to every view.
//!
//! `AppContext` owns the `SessionStore` and the shared `ApiClient`. Every
//! authenticated call goes out with the session's credential and its result
//! is fed back through `SessionStore::observe`, so a rejected token expires
//! the session no matter which view made the call.

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};
use crate::auth::{AuthError, Session, SessionState, SessionStore, TokenStore};
use crate::config::Config;
use crate::models::{DashboardStats, Item, ItemCreate, Organization, User, UserUpdate};
use crate::validate::{validate_item, validate_update, ValidationError};

/// Failure of a view operation that validates its input before calling the API
#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ViewError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ViewError::Api(e) if e.is_unauthorized())
    }
}

pub struct AppContext {
    api: ApiClient,
    session: SessionStore,
}

impl AppContext {
    pub fn new(api: ApiClient, storage: Box<dyn TokenStore>) -> Self {
        Self {
            api,
            session: SessionStore::new(storage),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config.api_url())?;
        let storage = config.token_store()?;
        debug!(api_url = config.api_url(), token_store = %config.token_store, "Context configured");
        Ok(Self::new(api, storage))
    }

    /// Reload the stored session. Call once at startup.
    pub fn restore(&mut self) -> SessionState {
        self.session.restore();
        self.session.state()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.session.login(&self.api, email, password).await
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session.logout()
    }

    /// The current user, confirming a restored session with the backend if needed
    pub async fn whoami(&mut self) -> Result<Option<User>, ApiError> {
        Ok(self.session.confirm(&self.api).await?.cloned())
    }

    /// Update the profile and replace the held identity with the server's copy
    pub async fn update_profile(&mut self, update: &UserUpdate) -> Result<User, ViewError> {
        validate_update(update)?;
        let client = self.session.client(&self.api);
        let result = client.update_me(update).await;
        let user = self.session.observe(result)?;
        info!(user_id = user.id, "Profile updated");
        self.session.replace_identity(user.clone());
        Ok(user)
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Fetch users and items concurrently and summarize them.
    /// Both requests run to completion in no particular order and both must
    /// succeed. When both fail, `Unauthorized` wins so the session still expires.
    pub async fn dashboard(&mut self) -> Result<DashboardStats, ApiError> {
        let client = self.session.client(&self.api);
        let (users, items) = futures::future::join(client.fetch_users(), client.fetch_items()).await;
        let result = match (users, items) {
            (Ok(users), Ok(items)) => Ok((users, items)),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(first), Err(second)) => {
                if second.is_unauthorized() && !first.is_unauthorized() {
                    Err(second)
                } else {
                    Err(first)
                }
            }
        };
        let (users, items) = self.session.observe(result)?;
        Ok(DashboardStats::from_collections(&users, items))
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub async fn list_items(&mut self) -> Result<Vec<Item>, ApiError> {
        let client = self.session.client(&self.api);
        let result = client.fetch_items().await;
        self.session.observe(result)
    }

    pub async fn item(&mut self, id: i64) -> Result<Item, ApiError> {
        let client = self.session.client(&self.api);
        let result = client.fetch_item(id).await;
        self.session.observe(result)
    }

    pub async fn create_item(&mut self, title: &str, description: &str) -> Result<Item, ViewError> {
        validate_item(title, description)?;
        let body = ItemCreate {
            title: title.trim().to_string(),
            description: description.to_string(),
        };
        let client = self.session.client(&self.api);
        let result = client.create_item(&body).await;
        let item = self.session.observe(result)?;
        info!(item_id = item.id, "Item created");
        Ok(item)
    }

    pub async fn delete_item(&mut self, id: i64) -> Result<(), ApiError> {
        let client = self.session.client(&self.api);
        let result = client.delete_item(id).await;
        self.session.observe(result)?;
        info!(item_id = id, "Item deleted");
        Ok(())
    }

    // =========================================================================
    // Organizations
    // =========================================================================

    pub async fn organizations(&mut self) -> Result<Vec<Organization>, ApiError> {
        let client = self.session.client(&self.api);
        let result = client.fetch_organizations().await;
        self.session.observe(result)
    }
}
