pub mod api;
pub mod config;
pub mod octopus;
pub mod types;

pub use api::{ApiError, ApiResult, DeploymentApi};
pub use config::OctopusConfig;
pub use octopus::OctopusClient;
pub use types::{Deployment, Environment, Project, ProjectGroup, Release};

pub mod prelude {
    pub use crate::api::*;
    pub use crate::config::*;
    pub use crate::octopus::*;
    pub use crate::types::*;
}
