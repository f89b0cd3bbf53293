//! High-level pipeline: publishes one markdown document as a DevJourney entry.
//!
//! Steps, strictly in order and one remote call at a time:
//!   1. Scan the document for media references ([`crate::scan`])
//!   2. For each reference, resolve the local file ([`crate::resolve`]), upload it,
//!      and rewrite the tag to the returned URI ([`crate::rewrite`])
//!   3. Extract front matter from the rewritten text ([`crate::metadata`])
//!   4. Map the project slug to an id ([`crate::project`])
//!   5. Submit the entry and report its id
//!
//! # Error Handling
//! A reference whose file is missing is logged and skipped. Every other
//! failure (unreadable document, bad front matter, any API error) aborts the
//! run immediately; nothing is retried and nothing is partially submitted.

use std::path::Path;

use chrono::NaiveTime;
use tracing::{error, info, warn};

use crate::contract::{CreateEntryRequest, DevJourneyApi};
use crate::error::{ApiError, PublishError};
use crate::metadata::{extract_metadata, DocumentMetadata};
use crate::project::{fetch_projects, find_project_id, resolve_project_id};
use crate::resolve::{document_dir, resolve_reference, ResolvedAsset};
use crate::rewrite::rewrite_reference;
use crate::scan::{scan_references, MediaReference};

#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Abort when the project slug matches no accessible project, instead of
    /// submitting with an empty project id.
    pub require_project: bool,
}

/// The working text after every resolvable reference has been uploaded and rewritten.
#[derive(Debug, Clone)]
pub struct RewrittenDocument {
    pub content: String,
    pub uploaded: Vec<ResolvedAsset>,
    pub skipped: Vec<MediaReference>,
}

#[derive(Debug)]
pub struct PublishReport {
    pub entry_id: String,
    pub uploaded: Vec<ResolvedAsset>,
    pub skipped: Vec<MediaReference>,
}

/// Upload every locally resolvable media reference in `markdown` and point its
/// tag at the uploaded copy.
///
/// References are handled in scan order. The first API error aborts.
pub async fn upload_media<A>(
    markdown: &str,
    document_dir: &Path,
    api: &A,
) -> Result<RewrittenDocument, ApiError>
where
    A: DevJourneyApi + ?Sized,
{
    let references = scan_references(markdown);
    info!(count = references.len(), "[PUBLISH] Found media references");

    let mut content = markdown.to_string();
    let mut uploaded = Vec::new();
    let mut skipped = Vec::new();

    for reference in references {
        let Some(absolute_path) = resolve_reference(document_dir, &reference) else {
            skipped.push(reference);
            continue;
        };

        let remote_uri = match api.upload_content(&absolute_path).await {
            Ok(uri) => uri,
            Err(e) => {
                error!(path = %absolute_path.display(), error = %e, "[PUBLISH][ERROR] Upload failed");
                return Err(e);
            }
        };

        content = rewrite_reference(&content, &reference.original_tag, &reference.path, &remote_uri);
        info!(
            path = %reference.path,
            uri = %remote_uri,
            "[PUBLISH] Rewrote media reference"
        );
        uploaded.push(ResolvedAsset {
            reference,
            absolute_path,
            remote_uri,
        });
    }

    Ok(RewrittenDocument {
        content,
        uploaded,
        skipped,
    })
}

/// Assemble the entry body. The date is sent as midnight UTC.
pub fn build_entry_request(
    metadata: &DocumentMetadata,
    project_id: String,
    content: String,
) -> CreateEntryRequest {
    CreateEntryRequest {
        project_id,
        date: metadata.date.and_time(NaiveTime::MIN).and_utc(),
        minutes_spent: metadata.time_spent_minutes,
        mood: metadata.mood.clone(),
        content,
        title: metadata.title.clone(),
    }
}

/// Run the whole pipeline for the document at `path`.
pub async fn publish_document<A>(
    path: &Path,
    api: &A,
    options: &PublishOptions,
) -> Result<PublishReport, PublishError>
where
    A: DevJourneyApi + ?Sized,
{
    info!(path = %path.display(), "[PUBLISH] Starting publish pipeline");

    let markdown = tokio::fs::read_to_string(path).await.map_err(|source| {
        error!(path = %path.display(), error = ?source, "[PUBLISH][ERROR] Failed to read document");
        PublishError::ReadDocument {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let rewritten = upload_media(&markdown, &document_dir(path), api).await?;

    let metadata = extract_metadata(&rewritten.content).map_err(|e| {
        error!(error = %e, "[PUBLISH][ERROR] Invalid front matter");
        e
    })?;
    info!(
        date = %metadata.date,
        project = %metadata.project,
        minutes = metadata.time_spent_minutes,
        "[PUBLISH] Extracted metadata"
    );

    let projects = fetch_projects(api).await?;
    let project_id = if options.require_project {
        match find_project_id(&projects, &metadata.project) {
            Some(id) => id.to_string(),
            None => {
                error!(slug = %metadata.project, "[PUBLISH][ERROR] Unknown project");
                return Err(PublishError::ProjectNotFound(metadata.project.clone()));
            }
        }
    } else {
        resolve_project_id(&projects, &metadata.project)
    };

    let request = build_entry_request(&metadata, project_id, rewritten.content);
    let created = api.create_entry(&request).await?;

    if !rewritten.skipped.is_empty() {
        warn!(
            count = rewritten.skipped.len(),
            "[PUBLISH] Some media references were left pointing at local paths"
        );
    }
    info!(entry_id = %created.id, "[PUBLISH] Entry created");

    Ok(PublishReport {
        entry_id: created.id,
        uploaded: rewritten.uploaded,
        skipped: rewritten.skipped,
    })
}
