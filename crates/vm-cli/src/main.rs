mod cli;
mod commands;
mod config;
mod error;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vm_infra::InstanceOps;
use vm_infra::ec2::Ec2Provider;

use crate::cli::{Cli, Request};
use crate::config::LaunchConfig;
use crate::error::CommandError;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Usage errors are resolved before the EC2 client exists, so they can
    // never reach the remote API.
    let request = match Cli::parse().into_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    println!("Provisioning/De-provisioning EC2 in progress");

    match execute(request).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(request: Request) -> Result<(), CommandError> {
    let provider = Ec2Provider::from_env().await.map_err(CommandError::Bootstrap)?;
    let ops: &dyn InstanceOps = &provider;

    match request {
        Request::Create { tag_key, tag_value } => {
            let config = LaunchConfig::load()?;
            commands::create::run(ops, &config, &tag_key, &tag_value).await?;
        }
        Request::DeleteByIds { ids } => {
            commands::delete::by_ids(ops, &ids).await?;
        }
        Request::DeleteByTag {
            tag_key,
            tag_values,
        } => {
            commands::delete::by_tag(ops, &tag_key, &tag_values).await?;
        }
    }

    Ok(())
}
