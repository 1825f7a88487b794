use clap::{Args, Parser, Subcommand};

use agenta::InitArgs;

/// Agenta CLI - inspect and sync variant configurations
#[derive(Parser)]
#[command(name = "agenta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Connection arguments; unset values fall back to AGENTA_* variables
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Application name (AGENTA_APP_NAME)
    #[arg(long, global = true)]
    pub app_name: Option<String>,

    /// Base name within the application (AGENTA_BASE_NAME)
    #[arg(long, global = true)]
    pub base_name: Option<String>,

    /// API key for the backend (AGENTA_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Base ID, skips the name lookup (AGENTA_BASE_ID)
    #[arg(long, global = true)]
    pub base_id: Option<String>,

    /// Application ID (AGENTA_APP_ID)
    #[arg(long, global = true)]
    pub app_id: Option<String>,

    /// Backend host (AGENTA_HOST, defaults to http://localhost)
    #[arg(long, global = true)]
    pub host: Option<String>,
}

impl From<ConnectionArgs> for InitArgs {
    fn from(args: ConnectionArgs) -> Self {
        InitArgs {
            app_name: args.app_name,
            base_name: args.base_name,
            api_key: args.api_key,
            base_id: args.base_id,
            app_id: args.app_id,
            host: args.host,
            ..InitArgs::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved connection identity
    Status,
    /// Fetch a configuration and print its parameters as JSON
    Pull {
        /// Configuration name
        #[arg(long, default_value = "default")]
        config_name: String,

        /// Deployed environment to read from (takes precedence over the name)
        #[arg(long)]
        environment: Option<String>,
    },
    /// Save parameters under a configuration name
    Push {
        /// Configuration name
        config_name: String,

        /// Parameters as a JSON object
        #[arg(long)]
        params: String,

        /// Replace an existing configuration of the same name
        #[arg(long)]
        overwrite: bool,
    },
}
