use anyhow::Context;
use bookrate_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Book cataloguing service
#[derive(Debug, Parser)]
#[command(name = "bookrate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the effective settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookrate settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookrate_telemetry::init(&settings.telemetry)?;
            bookrate_app::run(settings).await
        }
        Command::Migrate => {
            bookrate_telemetry::init(&settings.telemetry)?;
            let applied = bookrate_app::migrate(&settings).await?;
            tracing::info!(applied, "migrations applied");
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
