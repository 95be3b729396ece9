pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "admin-users")]
#[command(about = "Admin user management service")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Apply database migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Print a session token for a user")]
    Token {
        #[arg(help = "User id")]
        user_id: String,
    },

    #[command(about = "Give a user the super_admin role")]
    GrantSuperAdmin {
        #[arg(help = "User id")]
        user_id: String,
    },
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

    match cli.command.unwrap_or_else(|| Commands::Serve(Default::default())) {
        Commands::Serve(args) => commands::serve::handle(args).await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Token { user_id } => commands::token::handle(&user_id, output_format).await,
        Commands::GrantSuperAdmin { user_id } => commands::grant::handle(&user_id, output_format).await,
    }
}
