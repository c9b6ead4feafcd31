use crate::types::{Deployment, Environment, Project, ProjectGroup, Release};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Authentication failed, check the API key")]
    Authentication,

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Server returned {status}: {message}")]
    Unexpected { status: u16, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Read-only view of the deployment server. Every listing is fully
/// materialized; no cursor is managed on this side of the boundary.
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    async fn list_environments(&self) -> ApiResult<Vec<Environment>>;

    /// Server-side search by name. May return near-matches alongside the
    /// exact hit; callers filter.
    async fn search_projects(&self, name: &str) -> ApiResult<Vec<Project>>;

    async fn list_project_groups(&self) -> ApiResult<Vec<ProjectGroup>>;

    async fn list_projects_in_group(&self, group: &ProjectGroup) -> ApiResult<Vec<Project>>;

    async fn list_releases(&self, project: &Project) -> ApiResult<Vec<Release>>;

    async fn list_deployments(&self, release: &Release) -> ApiResult<Vec<Deployment>>;
}
