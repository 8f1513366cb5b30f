use anyhow::Context;

use stockpile_api::app;
use stockpile_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockpile_observability::init();

    let settings = Settings::from_env().context("invalid configuration")?;
    tracing::info!(
        project = %settings.project_name,
        api_prefix = %settings.api_prefix,
        persistent = settings.database.is_some(),
        "starting"
    );

    let services = app::build_services(&settings).await?;
    let router = app::build_app(services, &settings.api_prefix);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
