use crate::{
    settings::{ConnectionSettings, DatabaseKind},
    sql::{
        base::{adapter::SqlAdapter, error::ConnectorError},
        mysql::adapter::MySqlAdapter,
        postgres::adapter::PgAdapter,
    },
};

pub enum Adapter {
    MySql(MySqlAdapter),
    Postgres(PgAdapter),
}

impl Adapter {
    /// Opens a new session with the driver named in `settings`.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, ConnectorError> {
        match settings.driver {
            DatabaseKind::MySql => {
                let adapter = MySqlAdapter::connect(settings).await?;
                Ok(Adapter::MySql(adapter))
            }
            DatabaseKind::Postgres => {
                let adapter = PgAdapter::connect(settings).await?;
                Ok(Adapter::Postgres(adapter))
            }
        }
    }

    pub fn into_sql(self) -> Box<dyn SqlAdapter> {
        match self {
            Adapter::MySql(adapter) => Box::new(adapter),
            Adapter::Postgres(adapter) => Box::new(adapter),
        }
    }
}
