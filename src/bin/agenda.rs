use clap::Parser;

use agenda_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = agenda_api::cli::run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
