//! # DevJourney API client
//!
//! [`DevJourneyClient`] implements [`DevJourneyApi`] over HTTP with `reqwest`.
//! Every request carries the caller's key in the `x-api-key` header. Requests
//! are never retried: any status other than the one each endpoint documents
//! as success is returned as [`ApiError::Status`].
//!
//! | Call | Request | Success |
//! |---|---|---|
//! | `upload_content` | `POST /content`, multipart field `file` | `200 {"Uri": ...}` |
//! | `get_user_info` | `GET /users/info` | `200 {name, displayName, projects}` |
//! | `create_entry` | `POST /entries`, JSON body | `201 {"id": ...}` |

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::contract::{CreateEntryRequest, CreatedEntry, DevJourneyApi, UserInfo};
use crate::error::ApiError;

const API_KEY_HEADER: &str = "x-api-key";

/// Body of a successful `POST /content`. The backend spells the key `Uri`.
#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(rename = "Uri", alias = "uri", alias = "URI")]
    uri: String,
}

pub struct DevJourneyClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl DevJourneyClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        tracing::info!(api_root = %config.api_root, "Initialized DevJourneyClient");
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_root, path)
    }

    /// Fail with the response body attached unless the status is `expected`.
    async fn ensure_status(
        endpoint: &'static str,
        response: Response,
        expected: StatusCode,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            endpoint,
            status = status.as_u16(),
            body = %body,
            "Bad status from DevJourney API"
        );
        Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: Response,
    ) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(endpoint, error = ?e, "Failed to decode DevJourney response");
            ApiError::Decode {
                endpoint,
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl DevJourneyApi for DevJourneyClient {
    async fn upload_content(&self, path: &Path) -> Result<String, ApiError> {
        const ENDPOINT: &str = "/content";
        tracing::info!(path = %path.display(), "Uploading media file");

        let bytes = tokio::fs::read(path).await.map_err(|source| {
            tracing::error!(path = %path.display(), error = ?source, "Failed to read media file");
            ApiError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let size = bytes.len();
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(self.url(ENDPOINT))
            .header(API_KEY_HEADER, &self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = Self::ensure_status(ENDPOINT, response, StatusCode::OK).await?;
        let content: ContentResponse = Self::decode(ENDPOINT, response).await?;

        tracing::info!(
            path = %path.display(),
            size,
            uri = %content.uri,
            "Successfully uploaded media file"
        );
        Ok(content.uri)
    }

    async fn get_user_info(&self) -> Result<UserInfo, ApiError> {
        const ENDPOINT: &str = "/users/info";
        tracing::info!("Fetching user info");

        let response = self
            .http
            .get(self.url(ENDPOINT))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;
        let response = Self::ensure_status(ENDPOINT, response, StatusCode::OK).await?;
        let user: UserInfo = Self::decode(ENDPOINT, response).await?;

        tracing::info!(
            user = %user.name,
            projects = user.projects.len(),
            "Fetched user info"
        );
        Ok(user)
    }

    async fn create_entry(&self, req: &CreateEntryRequest) -> Result<CreatedEntry, ApiError> {
        const ENDPOINT: &str = "/entries";
        tracing::info!(
            project_id = %req.project_id,
            date = %req.date,
            minutes_spent = req.minutes_spent,
            content_len = req.content.len(),
            "Creating entry"
        );

        let response = self
            .http
            .post(self.url(ENDPOINT))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(req)
            .send()
            .await?;
        let response = Self::ensure_status(ENDPOINT, response, StatusCode::CREATED).await?;
        let created: CreatedEntry = Self::decode(ENDPOINT, response).await?;

        tracing::info!(entry_id = %created.id, "Successfully created entry");
        Ok(created)
    }
}
