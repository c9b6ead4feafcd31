use clap::{CommandFactory, Parser, Subcommand};
use client::{OctopusClient, OctopusConfig};
use octofreq::{gather, render, StatsRequest};
use tracing::warn;

const DEPLOYMENTS_EXAMPLES: &str = "\
Examples:
  # Get deployment stats for a project
  octofreq deployments --project 'Etrm.Til.FileSystemConnector' --environment 'Etrm Production'

  # Get deployment stats for all projects in a project group
  octofreq deployments --projectgroup 'Etrm.Integration' --environment 'Etrm Production'";

#[derive(Parser)]
#[command(name = "octofreq", version)]
#[command(about = "CLI for showing Octopus Deploy deployment frequency statistics")]
struct Cli {
    /// Octopus Deploy API key
    #[arg(long, global = true, env = "OCTOPUS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Octopus Deploy server endpoint
    #[arg(long, global = true, default_value = "http://octopus.dac.local")]
    url: String,

    /// Output format (only text is implemented)
    #[arg(long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Get deployment frequency statistics
    #[command(after_help = DEPLOYMENTS_EXAMPLES)]
    Deployments {
        /// Name of the project (exact match)
        #[arg(short, long)]
        project: Option<String>,

        /// Name of the project group (glob pattern)
        #[arg(short = 'g', long)]
        projectgroup: Option<String>,

        /// Environment for which to gather statistics (glob pattern)
        #[arg(short, long)]
        environment: Option<String>,

        /// How many days to look back for deployments
        #[arg(long, default_value_t = 30)]
        lookback: i64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.format != "text" {
        warn!(
            "Output format '{}' is not implemented, falling back to text",
            cli.format
        );
    }

    let command = match cli.command {
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let config = OctopusConfig::default()
        .with_base_url(cli.url)
        .with_api_key(cli.api_key.unwrap_or_default());
    let client = OctopusClient::new(config)?;

    match command {
        Commands::Deployments {
            project,
            projectgroup,
            environment,
            lookback,
        } => {
            let request = StatsRequest {
                project,
                project_group: projectgroup,
                environment,
                lookback_days: lookback,
            };

            let stats = gather(&client, &request, chrono::Utc::now()).await?;
            render(&stats, &mut std::io::stdout())?;
        }
    }

    Ok(())
}
