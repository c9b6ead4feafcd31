//! Name resolution against the deployment server.
//!
//! Environments and project groups are selected with shell-glob patterns
//! (`*`, `?`, character classes) and must match exactly one entity; projects
//! are matched by exact name against the server's search results. A selector
//! that matches nothing or more than one entity is an error, never a silent
//! pick.

use client::{ApiError, DeploymentApi, Environment, Project, ProjectGroup};
use glob::Pattern;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Environment matching '{pattern}' not found")]
    EnvironmentNotFound { pattern: String },

    #[error("Environment pattern '{pattern}' matches more than one environment: {names:?}")]
    AmbiguousEnvironment { pattern: String, names: Vec<String> },

    #[error("Project group matching '{pattern}' not found")]
    ProjectGroupNotFound { pattern: String },

    #[error("Project group pattern '{pattern}' matches more than one group: {names:?}")]
    AmbiguousProjectGroup { pattern: String, names: Vec<String> },

    #[error("Project '{name}' could not be found, check that it matches the project name exactly")]
    ProjectNotFound { name: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

fn parse_pattern(pattern: &str) -> ResolveResult<Pattern> {
    Pattern::new(pattern).map_err(|source| ResolveError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

pub async fn resolve_environment(
    api: &dyn DeploymentApi,
    pattern: &str,
) -> ResolveResult<Environment> {
    let glob = parse_pattern(pattern)?;
    let mut matches: Vec<Environment> = api
        .list_environments()
        .await?
        .into_iter()
        .filter(|environment| glob.matches(&environment.name))
        .collect();

    debug!("Pattern '{}' matched {} environments", pattern, matches.len());

    match matches.len() {
        0 => Err(ResolveError::EnvironmentNotFound {
            pattern: pattern.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(ResolveError::AmbiguousEnvironment {
            pattern: pattern.to_string(),
            names: matches.into_iter().map(|e| e.name).collect(),
        }),
    }
}

pub async fn resolve_project_group(
    api: &dyn DeploymentApi,
    pattern: &str,
) -> ResolveResult<ProjectGroup> {
    let glob = parse_pattern(pattern)?;
    let mut matches: Vec<ProjectGroup> = api
        .list_project_groups()
        .await?
        .into_iter()
        .filter(|group| glob.matches(&group.name))
        .collect();

    debug!(
        "Pattern '{}' matched {} project groups",
        pattern,
        matches.len()
    );

    match matches.len() {
        0 => Err(ResolveError::ProjectGroupNotFound {
            pattern: pattern.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(ResolveError::AmbiguousProjectGroup {
            pattern: pattern.to_string(),
            names: matches.into_iter().map(|g| g.name).collect(),
        }),
    }
}

pub async fn resolve_project(api: &dyn DeploymentApi, name: &str) -> ResolveResult<Project> {
    let candidates = api.search_projects(name).await?;

    // the search endpoint returns near-matches; exact equality is the
    // acceptance filter
    candidates
        .into_iter()
        .find(|project| project.name == name)
        .ok_or_else(|| ResolveError::ProjectNotFound {
            name: name.to_string(),
        })
}
