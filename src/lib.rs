//! bookrate application library
//!
//! Wires the books module into the kernel registry, database and HTTP server.

pub mod modules;

use anyhow::Context;
use bookrate_db::Pool;
use bookrate_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::books;

/// A fully initialized application: registry with every module, migrated pool.
pub struct App {
    pub registry: ModuleRegistry,
    pub pool: Pool,
}

/// Connect the database, register and initialize modules, apply migrations
/// and start modules.
pub async fn bootstrap(settings: &Settings) -> anyhow::Result<App> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookrate bootstrap starting"
    );

    let pool = bookrate_db::connect(&settings.database)
        .await
        .context("failed to open database")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &pool);

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;

    let applied = bookrate_db::run_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "migrations complete");

    registry.start_all(&ctx).await?;

    tracing::info!("bookrate bootstrap complete");
    Ok(App { registry, pool })
}

/// Run the HTTP server until shutdown, then stop modules and close the pool.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let app = bootstrap(&settings).await?;

    let served = bookrate_http::start_server(&app.registry, &settings).await;

    let stopped = app.registry.stop_all().await;
    app.pool.close().await;

    served.and(stopped)
}

/// Apply pending migrations without serving; returns how many were applied.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = bookrate_db::connect(&settings.database)
        .await
        .context("failed to open database")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &pool);

    let applied = bookrate_db::run_migrations(&pool, &registry.collect_migrations()).await;
    pool.close().await;
    applied
}
