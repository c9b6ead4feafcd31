use crate::stats::DeploymentStats;
use std::io::{self, Write};

/// Print per-project release listings followed by the summary line.
pub fn render(stats: &DeploymentStats, out: &mut impl Write) -> io::Result<()> {
    for project in &stats.projects {
        writeln!(out, "{}", project.name)?;
        for release in &project.releases {
            writeln!(
                out,
                "\t{}: {}",
                release.deployed_at.format("%d/%m"),
                release.version
            )?;
        }
    }

    match &stats.environment {
        Some(environment) => writeln!(
            out,
            "Number of releases to {} in the past {} days: {}",
            environment.name, stats.lookback_days, stats.total
        ),
        None => writeln!(
            out,
            "Number of releases across all environments in the past {} days: {}",
            stats.lookback_days, stats.total
        ),
    }
}
