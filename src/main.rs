mod cli;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ComplianceHostCommand, ResourceCommand, commands};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        ResourceCommand::ComplianceHost { state, command } => match command {
            ComplianceHostCommand::Apply(args) => commands::apply(&state, &args).await?,
            ComplianceHostCommand::Refresh(args) => commands::refresh(&state, &args).await?,
            ComplianceHostCommand::Destroy => commands::destroy(&state).await?,
            ComplianceHostCommand::Import(args) => commands::import(&state, &args).await?,
            ComplianceHostCommand::Show => commands::show(&state)?,
            ComplianceHostCommand::Schema => commands::schema(),
        },
    }

    tracing::info!("done");
    Ok(())
}
