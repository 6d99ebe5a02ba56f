//! API route handlers

pub mod health;
pub mod remote;
pub mod telemetry;
