//! Filter tabular datasets with a small SQL-like WHERE language.

pub mod app;
pub mod builder;
pub mod config;
pub mod dsl;
pub mod search;
pub mod sinks;
pub mod table;
