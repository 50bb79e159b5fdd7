// Library for tests to access modules

pub mod aggregator;
pub mod collectors;
pub mod config;
pub mod error;
pub mod exporter;
pub mod models;
pub mod routes;
pub mod source;
pub mod version;
