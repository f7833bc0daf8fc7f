use crate::{
    settings::ConnectionSettings,
    sql::base::{
        cursor::RowCursor,
        error::{ConnectorError, DbError},
    },
};
use async_trait::async_trait;
use planner::query::dialect::Dialect;

/// One open database connection.
///
/// An adapter owns exactly one session. It is not pooled and not shared:
/// callers connect, run their statements, then `close` it.
#[async_trait]
pub trait SqlAdapter: Send {
    async fn connect(settings: &ConnectionSettings) -> Result<Self, ConnectorError>
    where
        Self: Sized;

    fn dialect(&self) -> &dyn Dialect;

    /// Round-trips `SELECT 1`.
    async fn ping(&mut self) -> Result<(), DbError>;

    /// Runs a `SELECT COUNT(*)` style statement and returns its single value.
    async fn count_rows(&mut self, sql: &str) -> Result<u64, DbError>;

    /// Executes `sql` and returns a server-side cursor over its rows. The
    /// cursor borrows the connection until it is dropped.
    async fn open_cursor<'a>(
        &'a mut self,
        sql: &str,
    ) -> Result<Box<dyn RowCursor + 'a>, DbError>;

    /// Releases the session. Calling it twice is a no-op; any other call
    /// after `close` fails with [`DbError::Closed`].
    async fn close(&mut self) -> Result<(), DbError>;
}
