use clap::{Parser, Subcommand};

use crate::auth::create_token;
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "jobly")]
#[command(about = "Jobly CLI - administrative helpers for the Jobly API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print a signed token for a user")]
    Token {
        /// Username to embed in the token
        username: String,

        #[arg(long, help = "Grant admin rights")]
        admin: bool,
    },

    #[command(about = "Create the companies and jobs tables if missing")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Token { username, admin } => {
            let token = create_token(&username, admin)?;
            println!("{}", token);
        }
        Commands::Migrate => {
            let pool = DatabaseManager::pool()?;
            DatabaseManager::migrate(&pool).await?;
            DatabaseManager::close().await;
        }
    }
    Ok(())
}
