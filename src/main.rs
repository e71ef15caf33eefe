use anyhow::Context;
use tradeview_bridge::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tradeview_bridge::init_tracing();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tradeview_bridge::run(config).await?;
    Ok(())
}
