use tracing::{info, warn};

use crate::contract::{DevJourneyApi, Project};
use crate::error::ApiError;

/// Fetch every project the API key can file entries under.
pub async fn fetch_projects<A>(api: &A) -> Result<Vec<Project>, ApiError>
where
    A: DevJourneyApi + ?Sized,
{
    let user = api.get_user_info().await?;
    info!(
        user = %user.name,
        projects = user.projects.len(),
        "Fetched accessible projects"
    );
    Ok(user.projects)
}

/// Map a project slug to its id. Returns `None` when no project carries that slug.
pub fn find_project_id<'a>(projects: &'a [Project], slug: &str) -> Option<&'a str> {
    projects
        .iter()
        .find(|project| project.slug == slug)
        .map(|project| project.id.as_str())
}

/// Map a project slug to its id, falling back to an empty id when nothing matches.
pub fn resolve_project_id(projects: &[Project], slug: &str) -> String {
    match find_project_id(projects, slug) {
        Some(id) => id.to_string(),
        None => {
            warn!(
                slug = %slug,
                "No accessible project matches the slug, submitting without a project"
            );
            String::new()
        }
    }
}
