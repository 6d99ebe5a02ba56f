//! Prometheus remote storage adapter for BigQuery
//!
//! Accepts Prometheus remote write and remote read requests over HTTP and
//! maps them onto a fixed four-column warehouse table.

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
