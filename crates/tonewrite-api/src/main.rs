use anyhow::Context;
use tonewrite_api::setup;
use tonewrite_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize the application (storage, backend, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
