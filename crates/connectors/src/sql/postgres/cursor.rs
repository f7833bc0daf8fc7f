use crate::sql::base::{cursor::RowCursor, error::DbError, row::DbRow};
use async_trait::async_trait;
use model::core::value::Value;
use tokio_postgres::{Portal, Transaction};

/// A bound portal inside a read-only transaction; every
/// [`RowCursor::fetch_many`] is one `Execute` round trip with a row limit.
pub struct PgCursor<'a> {
    tx: Option<Transaction<'a>>,
    portal: Option<Portal>,
    columns: Vec<String>,
}

impl<'a> PgCursor<'a> {
    pub(crate) fn new(tx: Transaction<'a>, portal: Portal, columns: Vec<String>) -> Self {
        PgCursor {
            tx: Some(tx),
            portal: Some(portal),
            columns,
        }
    }
}

#[async_trait]
impl RowCursor for PgCursor<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn fetch_many(&mut self, max_rows: usize) -> Result<Vec<Vec<Value>>, DbError> {
        let (Some(tx), Some(portal)) = (self.tx.as_ref(), self.portal.as_ref()) else {
            return Err(DbError::Closed);
        };

        // a limit of 0 would mean "all remaining rows" to the server
        let limit = i32::try_from(max_rows.max(1)).unwrap_or(i32::MAX);
        let rows = tx.query_portal(portal, limit).await?;
        rows.iter()
            .map(|row| DbRow::PostgresRow(row).to_values())
            .collect()
    }

    async fn close(&mut self) -> Result<(), DbError> {
        drop(self.portal.take());
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}
