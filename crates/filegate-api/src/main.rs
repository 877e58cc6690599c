use filegate_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, storage, identity, routes)
    let (_state, router) = filegate_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    filegate_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
