use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated table or column name. Quoting happens at render time, so the
/// stored text is the raw name exactly as the caller wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ident(String);

impl Ident {
    pub fn new(name: impl Into<String>) -> Result<Self, QueryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(QueryError::EmptyIdentifier);
        }
        if name.contains('\0') {
            return Err(QueryError::NulInIdentifier(name));
        }
        Ok(Ident(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: Option<Ident>,
    pub name: Ident,
}

impl TableRef {
    /// Parses `table` or `schema.table`. Only the first dot separates the
    /// schema; anything after it belongs to the table name.
    pub fn parse(qualified: &str) -> Result<Self, QueryError> {
        match qualified.split_once('.') {
            Some((schema, name)) => Ok(TableRef {
                schema: Some(Ident::new(schema)?),
                name: Ident::new(name)?,
            }),
            None => Ok(TableRef {
                schema: None,
                name: Ident::new(qualified)?,
            }),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The column list of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    All,
    Columns(Vec<Ident>),
}

impl Projection {
    pub fn columns<I, S>(names: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = names
            .into_iter()
            .map(Ident::new)
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(QueryError::EmptyProjection);
        }
        Ok(Projection::Columns(columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_nul_identifiers() {
        assert_eq!(Ident::new("  "), Err(QueryError::EmptyIdentifier));
        assert!(matches!(
            Ident::new("a\0b"),
            Err(QueryError::NulInIdentifier(_))
        ));
    }

    #[test]
    fn parses_schema_qualified_tables() {
        let table = TableRef::parse("sales.orders").unwrap();
        assert_eq!(table.schema.as_ref().map(Ident::as_str), Some("sales"));
        assert_eq!(table.name.as_str(), "orders");

        let table = TableRef::parse("a.b.c").unwrap();
        assert_eq!(table.name.as_str(), "b.c");

        assert_eq!(TableRef::parse(".orders"), Err(QueryError::EmptyIdentifier));
    }

    #[test]
    fn empty_column_list_is_an_error() {
        assert_eq!(
            Projection::columns(Vec::<String>::new()),
            Err(QueryError::EmptyProjection)
        );
        assert!(matches!(
            Projection::columns(["id", "name"]),
            Ok(Projection::Columns(cols)) if cols.len() == 2
        ));
    }
}
