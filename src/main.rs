//! Server entry point.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use planilla::config::{Settings, StatutoryRates};
use planilla::db::Db;
use planilla::web::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    let rates = StatutoryRates::load_or_default(settings.statutory_path.as_deref())
        .context("loading statutory rates")?;

    let db = Db::open(&settings.database_path)
        .with_context(|| format!("opening database at {}", settings.database_path))?;
    db.migrate().context("applying schema")?;
    db.seed(&settings).context("seeding roles and admin user")?;

    let bind_addr = settings.bind_addr.clone();
    let state = AppState::new(db, settings, rates);
    let app = web::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(%bind_addr, "listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
