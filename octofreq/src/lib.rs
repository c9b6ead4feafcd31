pub mod report;
pub mod resolve;
pub mod stats;

pub use report::render;
pub use resolve::{
    resolve_environment, resolve_project, resolve_project_group, ResolveError, ResolveResult,
};
pub use stats::{
    gather, DeploymentStats, ProjectActivity, ReleaseActivity, StatsError, StatsRequest,
};
