use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
}

impl Environment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub project_group_id: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_group_id: None,
        }
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.project_group_id = Some(group_id.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectGroup {
    pub id: String,
    pub name: String,
}

impl ProjectGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Release {
    pub id: String,
    pub project_id: String,
    pub version: String,
    /// When the release was assembled; the ordering key for release history.
    pub assembled: DateTime<Utc>,
}

impl Release {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        version: impl Into<String>,
        assembled: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            version: version.into(),
            assembled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Deployment {
    pub id: String,
    pub release_id: String,
    pub environment_id: String,
    pub created: DateTime<Utc>,
}

impl Deployment {
    pub fn new(
        id: impl Into<String>,
        release_id: impl Into<String>,
        environment_id: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            release_id: release_id.into(),
            environment_id: environment_id.into(),
            created,
        }
    }
}
