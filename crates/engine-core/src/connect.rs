use async_trait::async_trait;
use connectors::{
    adapter::Adapter,
    settings::ConnectionSettings,
    sql::base::{adapter::SqlAdapter, error::ConnectorError},
};

/// Opens the session a fetch runs on. The fetcher holds one of these so the
/// driver can be swapped out, e.g. for an in-memory table in tests.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<Box<dyn SqlAdapter>, ConnectorError>;
}

/// Connects with the driver named in the settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct DriverConnector;

#[async_trait]
impl Connector for DriverConnector {
    async fn connect(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<Box<dyn SqlAdapter>, ConnectorError> {
        Adapter::connect(settings).await.map(Adapter::into_sql)
    }
}
