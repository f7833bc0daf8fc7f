use crate::{
    settings::ConnectionSettings,
    sql::{
        base::{
            adapter::SqlAdapter,
            cursor::RowCursor,
            error::{ConnectorError, DbError},
        },
        postgres::{cursor::PgCursor, utils::connect_client},
    },
};
use async_trait::async_trait;
use planner::query::dialect::{self, Dialect};
use tokio::task::JoinHandle;
use tokio_postgres::Client;
use tracing::{debug, info};

/// A single PostgreSQL session, opened without a pool.
pub struct PgAdapter {
    client: Option<Client>,
    connection: Option<JoinHandle<()>>,
    endpoint: String,
    dialect: dialect::Postgres,
}

impl PgAdapter {
    fn client(&mut self) -> Result<&mut Client, DbError> {
        self.client.as_mut().ok_or(DbError::Closed)
    }
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    async fn connect(settings: &ConnectionSettings) -> Result<Self, ConnectorError> {
        settings.validate()?;
        let endpoint = settings.endpoint();
        debug!("Connecting to Postgres at {}", endpoint);

        let (client, connection) = connect_client(settings.pg_config()).await?;
        info!("Connected to Postgres at {}", endpoint);

        Ok(PgAdapter {
            client: Some(client),
            connection: Some(connection),
            endpoint,
            dialect: dialect::Postgres,
        })
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn ping(&mut self) -> Result<(), DbError> {
        let row = self.client()?.query_one("SELECT 1", &[]).await?;
        let val: i32 = row.try_get(0)?;
        if val != 1 {
            return Err(DbError::Unknown(format!(
                "Postgres ping returned unexpected result: {val}"
            )));
        }
        Ok(())
    }

    async fn count_rows(&mut self, sql: &str) -> Result<u64, DbError> {
        debug!("Counting rows: {}", sql);
        let row = self.client()?.query_one(sql, &[]).await?;
        let count: i64 = row.try_get(0)?;
        u64::try_from(count).map_err(|_| DbError::InvalidCount(count.to_string()))
    }

    async fn open_cursor<'a>(
        &'a mut self,
        sql: &str,
    ) -> Result<Box<dyn RowCursor + 'a>, DbError> {
        debug!("Opening Postgres portal: {}", sql);
        // portals only live inside a transaction
        let tx = self
            .client()?
            .build_transaction()
            .read_only(true)
            .start()
            .await?;
        let statement = tx.prepare(sql).await?;
        let columns = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();
        let portal = tx.bind(&statement, &[]).await?;

        Ok(Box::new(PgCursor::new(tx, portal, columns)))
    }

    async fn close(&mut self) -> Result<(), DbError> {
        // dropping the client ends the connection task
        drop(self.client.take());
        if let Some(connection) = self.connection.take() {
            connection
                .await
                .map_err(|err| DbError::Unknown(format!("Postgres connection task failed: {err}")))?;
            debug!("Disconnected from Postgres at {}", self.endpoint);
        }
        Ok(())
    }
}
