//! Defines the AST for the two read queries issued against a table.

use crate::query::ast::common::{Projection, TableRef};

/// `SELECT <projection> FROM <table> [LIMIT n]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub projection: Projection,
    pub from: TableRef,
    pub limit: Option<u64>,
}

impl Select {
    pub fn new(from: TableRef, projection: Projection) -> Self {
        Select {
            projection,
            from,
            limit: None,
        }
    }

    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }
}

/// `SELECT COUNT(*) FROM <table>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRows {
    pub from: TableRef,
}
