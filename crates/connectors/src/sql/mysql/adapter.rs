use crate::{
    settings::ConnectionSettings,
    sql::{
        base::{
            adapter::SqlAdapter,
            cursor::RowCursor,
            error::{ConnectorError, DbError},
        },
        mysql::cursor::MySqlCursor,
    },
};
use async_trait::async_trait;
use mysql_async::{Conn, prelude::*};
use planner::query::dialect::{self, Dialect};
use tracing::{debug, info};

/// A single MySQL/MariaDB session, opened without a pool.
pub struct MySqlAdapter {
    conn: Option<Conn>,
    endpoint: String,
    dialect: dialect::MySql,
}

impl MySqlAdapter {
    fn conn(&mut self) -> Result<&mut Conn, DbError> {
        self.conn.as_mut().ok_or(DbError::Closed)
    }
}

#[async_trait]
impl SqlAdapter for MySqlAdapter {
    async fn connect(settings: &ConnectionSettings) -> Result<Self, ConnectorError> {
        settings.validate()?;
        let endpoint = settings.endpoint();
        debug!("Connecting to MySQL at {}", endpoint);

        let conn = Conn::new(settings.mysql_opts()).await?;
        info!("Connected to MySQL at {}", endpoint);

        Ok(MySqlAdapter {
            conn: Some(conn),
            endpoint,
            dialect: dialect::MySql,
        })
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn ping(&mut self) -> Result<(), DbError> {
        let val: Option<i32> = self.conn()?.query_first("SELECT 1").await?;
        match val {
            Some(1) => Ok(()),
            other => Err(DbError::Unknown(format!(
                "MySQL ping returned unexpected result: {other:?}"
            ))),
        }
    }

    async fn count_rows(&mut self, sql: &str) -> Result<u64, DbError> {
        debug!("Counting rows: {}", sql);
        let count: Option<u64> = self.conn()?.query_first(sql.to_owned()).await?;
        count.ok_or_else(|| DbError::InvalidCount(format!("no row returned by `{sql}`")))
    }

    async fn open_cursor<'a>(
        &'a mut self,
        sql: &str,
    ) -> Result<Box<dyn RowCursor + 'a>, DbError> {
        debug!("Opening MySQL cursor: {}", sql);
        // binary protocol so numbers and dates arrive typed, not as text
        let result = self.conn()?.exec_iter(sql.to_owned(), ()).await?;
        Ok(Box::new(MySqlCursor::new(result)))
    }

    async fn close(&mut self) -> Result<(), DbError> {
        if let Some(conn) = self.conn.take() {
            conn.disconnect().await?;
            debug!("Disconnected from MySQL at {}", self.endpoint);
        }
        Ok(())
    }
}
