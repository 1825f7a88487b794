use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use agenta::{ConnectionResolver, PullOutcome, PushOutcome};
use cli::args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return Ok(());
    };

    let resolver = agenta::init(cli.connection.into())
        .await
        .context("Failed to initialize Agenta")?;

    match command {
        Commands::Status => run_status(&resolver),
        Commands::Pull {
            config_name,
            environment,
        } => run_pull(&resolver, &config_name, environment.as_deref()).await,
        Commands::Push {
            config_name,
            params,
            overwrite,
        } => run_push(&resolver, &config_name, &params, overwrite).await,
    }
}

fn run_status(resolver: &ConnectionResolver) -> Result<()> {
    let identity = resolver
        .identity()
        .context("Resolver has no identity after init")?;

    println!("Host:         {}", identity.host);
    println!("App:          {}", display(&identity.app_name, &identity.app_id));
    println!("Base:         {}", display(&identity.base_name, &identity.base_id));
    if let Some(variant) = identity.variant_name.as_ref().or(identity.variant_id.as_ref()) {
        println!("Variant:      {}", variant);
    }
    println!(
        "API key:      {}",
        if identity.api_key.is_some() { "set" } else { "not set" }
    );
    println!("Persistable:  {}", identity.base_id.is_some());

    Ok(())
}

async fn run_pull(
    resolver: &ConnectionResolver,
    config_name: &str,
    environment: Option<&str>,
) -> Result<()> {
    let config = resolver.current_config()?;
    let mut config = config.lock().await;

    match config.pull(config_name, environment).await? {
        PullOutcome::Applied { version } => {
            eprintln!("Pulled version {}", version);
        }
        PullOutcome::Skipped => {
            eprintln!("Configuration is local-only; nothing pulled.");
        }
        PullOutcome::Failed => bail!("Failed to pull configuration {}", config_name),
    }

    println!("{}", serde_json::to_string_pretty(&config.all())?);
    Ok(())
}

async fn run_push(
    resolver: &ConnectionResolver,
    config_name: &str,
    params: &str,
    overwrite: bool,
) -> Result<()> {
    let params: Map<String, Value> =
        serde_json::from_str(params).context("--params must be a JSON object")?;

    let config = resolver.current_config()?;
    let config = config.lock().await;

    match config
        .try_push(config_name, overwrite, &params)
        .await
        .with_context(|| format!("Failed to push configuration {}", config_name))?
    {
        PushOutcome::Saved => {
            println!("Saved {} parameter(s) to {}", params.len(), config_name);
            Ok(())
        }
        PushOutcome::Skipped => {
            bail!("Configuration is not persistable; provide --app-name and --base-name or --base-id")
        }
        PushOutcome::Failed => unreachable!("try_push reports failures as errors"),
    }
}

fn display(name: &Option<String>, id: &Option<String>) -> String {
    match (name, id) {
        (Some(name), Some(id)) => format!("{} ({})", name, id),
        (Some(name), None) => name.clone(),
        (None, Some(id)) => id.clone(),
        (None, None) => "-".to_string(),
    }
}
