//! Remote protocol body encoding
//!
//! Remote write and read bodies are protobuf messages compressed with the
//! raw (block) snappy format, not the framed stream format.

use axum::body::Bytes;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use prost::Message;

use crate::core::constants::MAX_DECOMPRESSED_BODY;

/// Content type of remote protocol bodies
pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// Content encoding of remote protocol bodies
pub const SNAPPY_ENCODING: &str = "snappy";

/// Error returned when a request body cannot be decoded
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("snappy decode error: {0}")]
    Snappy(#[from] snap::Error),

    #[error("decompressed body of {declared} bytes exceeds limit of {limit}")]
    TooLarge { declared: usize, limit: usize },

    #[error("protobuf decode error: {0}")]
    Protobuf(#[from] prost::DecodeError),
}

impl IntoResponse for DecodeError {
    /// Internal error details are logged but not exposed to clients.
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Failed to decode remote request");
        (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain")],
            "Failed to decode request body",
        )
            .into_response()
    }
}

/// Decompress and decode a remote request body
pub fn decode_request<T>(body: &Bytes) -> Result<T, DecodeError>
where
    T: Message + Default,
{
    let declared = snap::raw::decompress_len(body.as_ref())?;
    if declared > MAX_DECOMPRESSED_BODY {
        return Err(DecodeError::TooLarge {
            declared,
            limit: MAX_DECOMPRESSED_BODY,
        });
    }
    let raw = snap::raw::Decoder::new().decompress_vec(body.as_ref())?;
    Ok(T::decode(raw.as_slice())?)
}

/// Encode and compress a message as a remote protocol response
pub fn encode_response<T: Message>(message: &T) -> Response {
    match snap::raw::Encoder::new().compress_vec(&message.encode_to_vec()) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, PROTOBUF_CONTENT_TYPE),
                (header::CONTENT_ENCODING, SNAPPY_ENCODING),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to compress remote response");
            internal_error()
        }
    }
}

/// Plain 500 response; details stay in the logs
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain")],
        "Internal server error",
    )
        .into_response()
}

#[cfg(test)]
pub(crate) fn encode_request<T: Message>(message: &T) -> Vec<u8> {
    snap::raw::Encoder::new()
        .compress_vec(&message.encode_to_vec())
        .unwrap()
}
