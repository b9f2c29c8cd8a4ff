pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use config::ClientSettings;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Taskboard CLI - Command-line client for the task board API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "TASKBOARD_URL", default_value = "http://localhost:5000", help = "Server base URL")]
    pub url: String,

    #[arg(long, global = true, env = "TASKBOARD_TOKEN", hide_env_values = true, help = "Bearer token")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check server health")]
    Health,

    #[command(about = "Create or refresh your user record from the current token")]
    Register,

    #[command(about = "Show current user information")]
    Me,

    #[command(about = "Board management")]
    Boards {
        #[command(subcommand)]
        cmd: commands::boards::BoardCommands,
    },

    #[command(about = "Todo management")]
    Todos {
        #[command(subcommand)]
        cmd: commands::todos::TodoCommands,
    },

    #[command(about = "Mint a development token signed with AUTH_JWT_SECRET")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let settings = ClientSettings::new(cli.url, cli.token);

    match cli.command {
        Commands::Health => commands::auth::health(&settings, output_format).await,
        Commands::Register => commands::auth::register(&settings, output_format).await,
        Commands::Me => commands::auth::me(&settings, output_format).await,
        Commands::Boards { cmd } => commands::boards::handle(cmd, &settings, output_format).await,
        Commands::Todos { cmd } => commands::todos::handle(cmd, &settings, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
    }
}
