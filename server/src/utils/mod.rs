//! Pure helpers shared across layers

pub mod sql;
pub mod time;
