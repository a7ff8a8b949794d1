//! Read-only student directory: roster loading, query engine, detail lookup
//! and the text renderings the `rize-align` binary prints.

pub mod config;
pub mod detail;
pub mod error;
pub mod models;
pub mod query;
pub mod report;
pub mod store;
