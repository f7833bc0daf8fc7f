pub mod connect;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod progress;
pub mod request;
pub mod tuning;
