pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hungry")]
#[command(about = "HungryFood CLI - operator tools for the ordering backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Issue a session token for an email using the configured secret")]
    Token {
        #[arg(long, help = "Email to embed in the token")]
        email: String,
    },

    #[command(about = "Give a stored user the admin role")]
    Promote {
        #[arg(long, help = "Email of the user to promote")]
        email: String,
    },

    #[command(about = "Check a running server's /health endpoint")]
    Health {
        #[arg(long, default_value = "http://localhost:5000", help = "Server base URL")]
        url: String,
    },
}

#[derive(Debug, Clone, Copy)]
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

    match cli.command {
        Commands::Token { email } => commands::token::handle(email, output_format).await,
        Commands::Promote { email } => commands::promote::handle(email, output_format).await,
        Commands::Health { url } => commands::health::handle(url, output_format).await,
    }
}
