use anyhow::Context;
use bookrate_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookrate settings")?;
    bookrate_telemetry::init(&settings.telemetry)?;

    bookrate_app::run(settings).await
}
