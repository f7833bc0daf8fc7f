#![allow(dead_code)]

use engine_core::{
    fetcher::{FetchOutput, TableFetcher},
    request::FetchRequest,
};
use model::{core::value::Value, records::table::TableData};

pub const USERS_TABLE_DDL: &str = "CREATE TABLE tf_users (id INT PRIMARY KEY, name VARCHAR(32) NOT NULL)";

pub const USERS_ROWS: &str =
    "INSERT INTO tf_users (id, name) VALUES (1, 'ada'), (2, 'brian'), (3, 'carol'), (4, 'dmitri'), (5, 'erin')";

/// `INSERT` statements that fill `table(id)` with `1..=count`, a thousand
/// rows per statement.
pub fn sequence_inserts(table: &str, count: usize) -> Vec<String> {
    (1..=count)
        .collect::<Vec<_>>()
        .chunks(1000)
        .map(|ids| {
            let values = ids
                .iter()
                .map(|id| format!("({id})"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("INSERT INTO {table} (id) VALUES {values}")
        })
        .collect()
}

pub async fn fetch(fetcher: &TableFetcher, request: FetchRequest) -> FetchOutput {
    fetcher
        .fetch_with_stats(&request)
        .await
        .unwrap_or_else(|e| panic!("fetch of {} failed: {e}", request.table))
}

/// Rows ordered by `column`; servers make no ordering promise without
/// `ORDER BY`.
pub fn sorted_by(mut table: TableData, column: &str) -> TableData {
    table.sort_by_column(column).expect("sort column exists");
    table
}

pub fn ints(table: &TableData, column: &str) -> Vec<i64> {
    table
        .column(column)
        .expect("column exists")
        .into_iter()
        .map(|v| v.as_i64().expect("integer cell"))
        .collect()
}

pub fn cell<'a>(table: &'a TableData, row: usize, column: &str) -> &'a Value {
    table
        .get(row, column)
        .unwrap_or_else(|| panic!("no cell at row {row}, column {column}"))
}
