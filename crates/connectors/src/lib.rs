pub mod adapter;
pub mod settings;
pub mod sql;
