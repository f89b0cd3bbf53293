//! # contract: the DevJourney API surface used by the upload pipeline
//!
//! This module defines the [`DevJourneyApi`] trait and the plain data types
//! exchanged with the DevJourney backend. The pipeline in [`crate::publish`]
//! only ever talks to the trait, so it runs unchanged against the real
//! [`crate::upload::DevJourneyClient`] or a generated `MockDevJourneyApi`.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; the mock is exported under the
//!   default `test-export-mocks` feature so integration tests can use it.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A project the caller can file entries under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// Response of `GET /users/info`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub display_name: String,
    pub projects: Vec<Project>,
}

/// Body of `POST /entries`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub project_id: String,
    pub date: DateTime<Utc>,
    pub minutes_spent: i64,
    pub mood: String,
    pub content: String,
    pub title: String,
}

/// Response of a successful `POST /entries`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedEntry {
    pub id: String,
}

/// Remote operations needed to publish one document.
///
/// Every method is a single request; implementors must not retry. A
/// non-success status is reported as [`ApiError::Status`].
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait DevJourneyApi: Send + Sync {
    /// Upload a local file to the content store and return its remote URI.
    async fn upload_content(&self, path: &Path) -> Result<String, ApiError>;

    /// Fetch the authenticated user, including every accessible project.
    async fn get_user_info(&self) -> Result<UserInfo, ApiError>;

    /// Create the journal entry.
    async fn create_entry(&self, req: &CreateEntryRequest) -> Result<CreatedEntry, ApiError>;
}
