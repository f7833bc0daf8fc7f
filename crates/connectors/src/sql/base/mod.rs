pub mod adapter;
pub mod cursor;
pub mod error;
pub mod row;
