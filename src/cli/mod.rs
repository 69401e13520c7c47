use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::database::manager;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Agenda CLI - provisioning helpers for the appointment API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the appointments table if it does not exist")]
    InitDb,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::InitDb => init_db().await,
    }
}

async fn init_db() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let pool = manager::connect(&config.database).await?;
    manager::ensure_schema(&pool).await?;
    println!("appointments table ready");
    Ok(())
}
