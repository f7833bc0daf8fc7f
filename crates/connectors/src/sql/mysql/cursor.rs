use crate::sql::base::{cursor::RowCursor, error::DbError, row::DbRow};
use async_trait::async_trait;
use model::core::value::Value;
use mysql_async::{BinaryProtocol, QueryResult};

/// Streams the rows of one prepared statement off the wire. Rows are only
/// read from the socket when [`RowCursor::fetch_many`] asks for them.
pub struct MySqlCursor<'a> {
    result: Option<QueryResult<'a, 'static, BinaryProtocol>>,
    columns: Vec<String>,
}

impl<'a> MySqlCursor<'a> {
    pub(crate) fn new(result: QueryResult<'a, 'static, BinaryProtocol>) -> Self {
        let columns = result
            .columns()
            .map(|cols| cols.iter().map(|c| c.name_str().into_owned()).collect())
            .unwrap_or_default();

        MySqlCursor {
            result: Some(result),
            columns,
        }
    }
}

#[async_trait]
impl RowCursor for MySqlCursor<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn fetch_many(&mut self, max_rows: usize) -> Result<Vec<Vec<Value>>, DbError> {
        let Some(result) = self.result.as_mut() else {
            return Err(DbError::Closed);
        };

        let mut batch = Vec::with_capacity(max_rows.min(1024));
        while batch.len() < max_rows {
            match result.next().await? {
                Some(row) => batch.push(DbRow::MySqlRow(&row).to_values()?),
                None => break,
            }
        }
        Ok(batch)
    }

    async fn close(&mut self) -> Result<(), DbError> {
        if let Some(result) = self.result.take() {
            result.drop_result().await?;
        }
        Ok(())
    }
}
