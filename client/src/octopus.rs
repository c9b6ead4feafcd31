use crate::api::{ApiError, ApiResult, DeploymentApi};
use crate::config::OctopusConfig;
use crate::types::{Deployment, Environment, Project, ProjectGroup, Release};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

/// Envelope for the server's paged list endpoints. Only the first page is
/// consumed, matching the listings the reporting pipeline needs.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PagedItems<T> {
    items: Vec<T>,
}

pub struct OctopusClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OctopusClient {
    pub fn new(config: OctopusConfig) -> ApiResult<Self> {
        config
            .validate()
            .map_err(|msg| ApiError::InvalidConfig { message: msg })?;

        let base_url = if config.base_url.ends_with('/') {
            config.base_url.clone()
        } else {
            format!("{}/", config.base_url)
        };

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            ApiError::InvalidConfig {
                message: "API key contains characters not allowed in a header".to_string(),
            }
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let mut request = self.http_client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::ServiceUnavailable {
                    message: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                ApiError::ServiceUnavailable {
                    message: "Cannot connect to the Octopus server".to_string(),
                }
            } else {
                ApiError::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Authentication);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Unexpected {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(ApiError::Network)
    }

    async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<Vec<T>> {
        let page: PagedItems<T> = self.get_json(path, query).await?;
        Ok(page.items)
    }
}

#[async_trait]
impl DeploymentApi for OctopusClient {
    async fn list_environments(&self) -> ApiResult<Vec<Environment>> {
        let environments: Vec<Environment> = self.get_json("api/environments/all", &[]).await?;
        info!("Retrieved {} environments", environments.len());
        Ok(environments)
    }

    async fn search_projects(&self, name: &str) -> ApiResult<Vec<Project>> {
        debug!("Searching projects by name: {}", name);
        self.get_paged("api/projects", &[("name", name)]).await
    }

    async fn list_project_groups(&self) -> ApiResult<Vec<ProjectGroup>> {
        let groups: Vec<ProjectGroup> = self.get_json("api/projectgroups/all", &[]).await?;
        info!("Retrieved {} project groups", groups.len());
        Ok(groups)
    }

    async fn list_projects_in_group(&self, group: &ProjectGroup) -> ApiResult<Vec<Project>> {
        self.get_paged(&format!("api/projectgroups/{}/projects", group.id), &[])
            .await
    }

    async fn list_releases(&self, project: &Project) -> ApiResult<Vec<Release>> {
        self.get_paged(&format!("api/projects/{}/releases", project.id), &[])
            .await
    }

    async fn list_deployments(&self, release: &Release) -> ApiResult<Vec<Deployment>> {
        self.get_paged(&format!("api/releases/{}/deployments", release.id), &[])
            .await
    }
}
