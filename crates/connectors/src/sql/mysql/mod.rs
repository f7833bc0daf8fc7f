pub mod adapter;
pub mod cursor;
