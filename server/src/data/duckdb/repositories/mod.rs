//! DuckDB repositories

pub mod samples;
