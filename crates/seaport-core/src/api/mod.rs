//! REST API client module for the Internal Sea Core backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! `/api/v1` endpoints and the `ApiError` taxonomy it reports.
//!
//! Authenticated endpoints take a JWT bearer token obtained from
//! `POST /api/v1/auth/login`.

pub mod client;
pub mod error;

pub use client::{ApiClient, API_PREFIX};
pub use error::ApiError;
