use std::sync::Arc;

use depined_pinger::{
    api::DepinedClient,
    config::Config,
    constants::BANNER,
    http::ClientPool,
    logger::init_default_logger,
    supervisor::{spawn_signal_listener, Supervisor},
    utils::delay,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let _guard = init_default_logger();

    let config = Config::read_default().await?;

    tracing::info!("{BANNER}");
    delay(config.startup_delay()).await;

    let pool = Arc::new(ClientPool::new(config.request_timeout()));
    let api = Arc::new(DepinedClient::new(config.base_url.clone(), pool));

    let supervisor = Supervisor::new(config, api);
    spawn_signal_listener(supervisor.shutdown_token());

    supervisor.run().await
}
