use crate::error::CliError;
use connectors::{adapter::Adapter, settings::ConnectionSettings};
use tracing::{error, info};

/// Connects, runs `SELECT 1` and disconnects.
pub async fn ping(settings: &ConnectionSettings) -> Result<(), CliError> {
    let endpoint = settings.endpoint();
    info!("Pinging {} at '{}'", settings.driver, endpoint);

    let mut adapter = Adapter::connect(settings)
        .await
        .map_err(|e| {
            error!("Connection to '{}' failed: {}", endpoint, e);
            e
        })?
        .into_sql();

    let result = adapter.ping().await;
    let closed = adapter.close().await;

    if let Err(e) = &result {
        error!("Ping query on '{}' failed: {}", endpoint, e);
    }
    result?;
    closed?;

    info!("Ping to '{}' succeeded", endpoint);
    Ok(())
}
