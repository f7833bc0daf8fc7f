use crate::sql::base::error::DbError;
use async_trait::async_trait;
use model::core::value::Value;

/// Incremental access to the rows of one executed query.
#[async_trait]
pub trait RowCursor: Send {
    /// Column labels as reported by the server, in projection order.
    fn columns(&self) -> &[String];

    /// Returns up to `max_rows` rows; an empty batch means the cursor is
    /// exhausted. `max_rows` must be at least 1.
    async fn fetch_many(&mut self, max_rows: usize) -> Result<Vec<Vec<Value>>, DbError>;

    /// Discards any unread rows and frees the server-side resources.
    async fn close(&mut self) -> Result<(), DbError>;
}
