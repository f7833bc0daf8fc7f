use crate::{error::FetchError, tuning::DEFAULT_LATENCY_THRESHOLD};
use planner::query::ast::common::{Projection, TableRef};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// What to read and how to page through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// `table` or `schema.table`.
    pub table: String,
    /// `None` selects every column in table order.
    pub columns: Option<Vec<String>>,
    /// Rows per round trip, or the starting size in adaptive mode.
    pub chunk_size: usize,
    pub adaptive: bool,
    /// A batch slower than this halves the next chunk in adaptive mode.
    pub latency_threshold: Duration,
}

impl FetchRequest {
    pub fn new(table: impl Into<String>) -> Self {
        FetchRequest {
            table: table.into(),
            columns: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            adaptive: false,
            latency_threshold: DEFAULT_LATENCY_THRESHOLD,
        }
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn latency_threshold(mut self, threshold: Duration) -> Self {
        self.latency_threshold = threshold;
        self
    }

    /// Checks the request and resolves its names into query parts. Nothing
    /// here touches the network.
    pub(crate) fn plan(&self) -> Result<(TableRef, Projection), FetchError> {
        if self.chunk_size == 0 {
            return Err(FetchError::InvalidRequest(
                "chunk size must be at least 1".to_string(),
            ));
        }

        let table = TableRef::parse(&self.table)?;
        let projection = match &self.columns {
            Some(columns) => Projection::columns(columns.iter().cloned())?,
            None => Projection::All,
        };
        Ok((table, projection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::query::ast::common::Ident;

    #[test]
    fn defaults() {
        let request = FetchRequest::new("users");
        assert_eq!(request.chunk_size, 100);
        assert!(!request.adaptive);
        assert_eq!(request.columns, None);
        assert_eq!(request.latency_threshold, Duration::from_secs(1));
    }

    #[test]
    fn plan_resolves_schema_and_columns() {
        let (table, projection) = FetchRequest::new("sales.orders")
            .columns(["id", "total"])
            .plan()
            .unwrap();

        assert_eq!(table.schema, Some(Ident::new("sales").unwrap()));
        assert_eq!(table.name.as_str(), "orders");
        assert_eq!(
            projection,
            Projection::Columns(vec![Ident::new("id").unwrap(), Ident::new("total").unwrap()])
        );
    }

    #[test]
    fn plan_rejects_bad_requests() {
        let cases = [
            FetchRequest::new("users").chunk_size(0),
            FetchRequest::new(""),
            FetchRequest::new("users").columns(Vec::<String>::new()),
            FetchRequest::new("users").columns(["id", "bad\0name"]),
        ];

        for request in cases {
            assert!(
                matches!(request.plan(), Err(FetchError::InvalidRequest(_))),
                "{request:?} should be rejected"
            );
        }
    }
}
