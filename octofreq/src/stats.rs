//! Deployment frequency aggregation.
//!
//! Expands the project/group selectors into a de-duplicated project set,
//! walks each project's releases oldest-first, and counts at most one
//! qualifying deployment per release inside the lookback window.

use crate::resolve::{resolve_environment, resolve_project, resolve_project_group, ResolveError};
use chrono::{DateTime, Duration, Utc};
use client::{ApiError, DeploymentApi, Environment, Project};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct StatsRequest {
    /// Project name, matched exactly.
    pub project: Option<String>,
    /// Project group glob pattern.
    pub project_group: Option<String>,
    /// Environment glob pattern; `None` matches any environment.
    pub environment: Option<String>,
    pub lookback_days: i64,
}

impl Default for StatsRequest {
    fn default() -> Self {
        Self {
            project: None,
            project_group: None,
            environment: None,
            lookback_days: 30,
        }
    }
}

impl StatsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, name: impl Into<String>) -> Self {
        self.project = Some(name.into());
        self
    }

    pub fn with_project_group(mut self, pattern: impl Into<String>) -> Self {
        self.project_group = Some(pattern.into());
        self
    }

    pub fn with_environment(mut self, pattern: impl Into<String>) -> Self {
        self.environment = Some(pattern.into());
        self
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseActivity {
    pub version: String,
    /// Creation time of the qualifying deployment.
    pub deployed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProjectActivity {
    pub name: String,
    pub releases: Vec<ReleaseActivity>,
}

#[derive(Debug, Clone)]
pub struct DeploymentStats {
    /// Projects with at least one qualifying release, in selection order.
    pub projects: Vec<ProjectActivity>,
    pub total: usize,
    pub lookback_days: i64,
    /// The resolved environment filter, when one was requested.
    pub environment: Option<Environment>,
}

/// Resolve the request's selectors and aggregate deployment activity within
/// the lookback window ending at `now`.
pub async fn gather(
    api: &dyn DeploymentApi,
    request: &StatsRequest,
    now: DateTime<Utc>,
) -> Result<DeploymentStats, StatsError> {
    let environment = match &request.environment {
        Some(pattern) => Some(resolve_environment(api, pattern).await?),
        None => None,
    };

    let projects = select_projects(api, request).await?;
    debug!("Aggregating deployments across {} projects", projects.len());

    let cutoff = now - Duration::days(request.lookback_days);

    let mut activities = Vec::new();
    let mut total = 0;

    for project in &projects {
        let mut releases = api.list_releases(project).await?;
        // scan oldest first, whatever order the server returned
        releases.sort_by_key(|release| release.assembled);

        let mut qualifying = Vec::new();
        for release in &releases {
            let deployments = api.list_deployments(release).await?;
            let hit = deployments.iter().find(|deployment| {
                environment
                    .as_ref()
                    .map_or(true, |e| e.id == deployment.environment_id)
                    && deployment.created > cutoff
            });

            // one count per release, no matter how often it was deployed
            if let Some(deployment) = hit {
                qualifying.push(ReleaseActivity {
                    version: release.version.clone(),
                    deployed_at: deployment.created,
                });
            }
        }

        if !qualifying.is_empty() {
            total += qualifying.len();
            activities.push(ProjectActivity {
                name: project.name.clone(),
                releases: qualifying,
            });
        }
    }

    Ok(DeploymentStats {
        projects: activities,
        total,
        lookback_days: request.lookback_days,
        environment,
    })
}

/// Union of the group's member projects and the explicitly named project,
/// de-duplicated by id. No selector at all yields an empty set.
async fn select_projects(
    api: &dyn DeploymentApi,
    request: &StatsRequest,
) -> Result<Vec<Project>, StatsError> {
    let mut projects = Vec::new();

    if let Some(pattern) = &request.project_group {
        let group = resolve_project_group(api, pattern).await?;
        projects.extend(api.list_projects_in_group(&group).await?);
    }

    if let Some(name) = &request.project {
        let project = resolve_project(api, name).await?;
        if !projects.iter().any(|p| p.id == project.id) {
            projects.push(project);
        }
    }

    Ok(projects)
}
