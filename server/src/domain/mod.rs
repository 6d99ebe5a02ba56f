//! Domain logic
//!
//! - `remote` - Prometheus remote storage engine (codec, writer, translator, merger)

pub mod remote;
