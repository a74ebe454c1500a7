use anyhow::Context;
use diabetes_advisor::{about::AboutCards, model, server, AdvisorConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AdvisorConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        model = %cfg.model_path.display(),
        assets = %cfg.assets_dir.display(),
        "configuration loaded"
    );

    let mdl = model::load_classifier(&cfg.model_path)?;
    model::warmup(mdl.as_ref())?;

    let about = AboutCards::render(&cfg.assets_dir);
    tracing::info!(team = about.team.len(), "about cards rendered");

    let app = server::router(server::AppState::new(mdl, about));

    let addr = cfg.socket_addr();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
