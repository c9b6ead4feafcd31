use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use client::{
    ApiResult, Deployment, DeploymentApi, Environment, Project, ProjectGroup, Release,
};
use octofreq::{gather, render, StatsRequest};
use std::collections::HashMap;

struct ServerFixture {
    environments: Vec<Environment>,
    projects: Vec<Project>,
    releases: HashMap<String, Vec<Release>>,
    deployments: HashMap<String, Vec<Deployment>>,
}

#[async_trait]
impl DeploymentApi for ServerFixture {
    async fn list_environments(&self) -> ApiResult<Vec<Environment>> {
        Ok(self.environments.clone())
    }

    async fn search_projects(&self, name: &str) -> ApiResult<Vec<Project>> {
        // near-match behavior of the real search endpoint
        Ok(self
            .projects
            .iter()
            .filter(|p| p.name.starts_with(name))
            .cloned()
            .collect())
    }

    async fn list_project_groups(&self) -> ApiResult<Vec<ProjectGroup>> {
        Ok(vec![])
    }

    async fn list_projects_in_group(&self, _group: &ProjectGroup) -> ApiResult<Vec<Project>> {
        Ok(vec![])
    }

    async fn list_releases(&self, project: &Project) -> ApiResult<Vec<Release>> {
        Ok(self.releases.get(&project.id).cloned().unwrap_or_default())
    }

    async fn list_deployments(&self, release: &Release) -> ApiResult<Vec<Deployment>> {
        Ok(self.deployments.get(&release.id).cloned().unwrap_or_default())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

/// Project "P" with two releases: the older one deployed to Production ten
/// days ago, the newer one deployed to Staging five days ago.
fn fixture() -> ServerFixture {
    let mut releases = HashMap::new();
    releases.insert(
        "Projects-1".to_string(),
        // newest-first, as the server returns them
        vec![
            Release::new("Releases-2", "Projects-1", "2.0.0", days_ago(7)),
            Release::new("Releases-1", "Projects-1", "1.0.0", days_ago(12)),
        ],
    );

    let mut deployments = HashMap::new();
    deployments.insert(
        "Releases-1".to_string(),
        vec![Deployment::new(
            "Deployments-1",
            "Releases-1",
            "Environments-1",
            days_ago(10),
        )],
    );
    deployments.insert(
        "Releases-2".to_string(),
        vec![Deployment::new(
            "Deployments-2",
            "Releases-2",
            "Environments-2",
            days_ago(5),
        )],
    );

    ServerFixture {
        environments: vec![
            Environment::new("Environments-1", "Production"),
            Environment::new("Environments-2", "Staging"),
        ],
        projects: vec![Project::new("Projects-1", "P")],
        releases,
        deployments,
    }
}

fn render_to_string(stats: &octofreq::DeploymentStats) -> String {
    let mut out = Vec::new();
    render(stats, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_environment_filter_within_lookback() {
    let api = fixture();
    let request = StatsRequest::new()
        .with_project("P")
        .with_environment("Production")
        .with_lookback_days(30);

    let stats = gather(&api, &request, now()).await.unwrap();

    assert_eq!(stats.total, 1);
    assert_eq!(stats.projects.len(), 1);
    assert_eq!(stats.projects[0].name, "P");
    assert_eq!(stats.projects[0].releases[0].version, "1.0.0");

    let output = render_to_string(&stats);
    assert_eq!(
        output,
        "P\n\t22/05: 1.0.0\nNumber of releases to Production in the past 30 days: 1\n"
    );
}

#[tokio::test]
async fn test_shorter_lookback_excludes_everything() {
    let api = fixture();
    let request = StatsRequest::new()
        .with_project("P")
        .with_environment("Production")
        .with_lookback_days(5);

    let stats = gather(&api, &request, now()).await.unwrap();

    assert_eq!(stats.total, 0);
    assert!(stats.projects.is_empty());

    // no project header, just the summary
    let output = render_to_string(&stats);
    assert_eq!(
        output,
        "Number of releases to Production in the past 5 days: 0\n"
    );
}

#[tokio::test]
async fn test_no_environment_filter_counts_all_environments() {
    let api = fixture();
    let request = StatsRequest::new().with_project("P").with_lookback_days(30);

    let stats = gather(&api, &request, now()).await.unwrap();

    // both releases qualify, oldest listed first
    assert_eq!(stats.total, 2);
    let output = render_to_string(&stats);
    assert_eq!(
        output,
        "P\n\t22/05: 1.0.0\n\t27/05: 2.0.0\nNumber of releases across all environments in the past 30 days: 2\n"
    );
}

#[tokio::test]
async fn test_empty_selection_reports_zero() {
    let api = fixture();
    let request = StatsRequest::new().with_lookback_days(30);

    let stats = gather(&api, &request, now()).await.unwrap();

    assert_eq!(stats.total, 0);
    let output = render_to_string(&stats);
    assert_eq!(
        output,
        "Number of releases across all environments in the past 30 days: 0\n"
    );
}
