//! Remote read endpoint

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::RemoteState;
use super::encoding::{decode_request, encode_response, internal_error};
use crate::domain::remote::prompb::ReadRequest;

pub async fn read(State(state): State<RemoteState>, body: Bytes) -> Response {
    let start = Instant::now();

    let request: ReadRequest = match decode_request(&body) {
        Ok(req) => req,
        Err(e) => {
            state.telemetry.read_failed();
            return e.into_response();
        }
    };

    let [reader] = state.readers.as_slice() else {
        tracing::warn!(
            readers = state.readers.len(),
            "Remote read needs exactly one configured reader"
        );
        state.telemetry.read_failed();
        return (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain")],
            "Exactly one reader is required",
        )
            .into_response();
    };

    tracing::debug!(
        queries = request.queries.len(),
        remote = reader.name(),
        "Received remote read"
    );

    match reader.read(&request).await {
        Ok(response) => {
            state
                .telemetry
                .observe_read_api(reader.name(), start.elapsed());
            encode_response(&response)
        }
        Err(e) => {
            tracing::warn!(
                remote = reader.name(),
                error = %e,
                "Error executing query"
            );
            state.telemetry.read_failed();
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use prost::Message;
    use tower::ServiceExt;

    use super::super::encoding::{SNAPPY_ENCODING, encode_request};
    use super::super::routes;
    use super::super::test_support::{FailingRemote, duckdb_state};
    use super::*;
    use crate::domain::remote::prompb::{
        Label, LabelMatcher, MatchType, Query, ReadResponse, Sample, TimeSeries, WriteRequest,
    };

    fn post(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(body))
            .unwrap()
    }

    fn read_body(name: &str) -> Vec<u8> {
        encode_request(&ReadRequest {
            queries: vec![Query {
                start_timestamp_ms: 0,
                end_timestamp_ms: 10_000,
                matchers: vec![LabelMatcher::new(MatchType::Eq, "__name__", name)],
            }],
            accepted_response_types: vec![],
        })
    }

    async fn decode_response(response: Response) -> ReadResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let raw = snap::raw::Decoder::new().decompress_vec(&bytes).unwrap();
        ReadResponse::decode(raw.as_slice()).unwrap()
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let state = duckdb_state().await;
        let router = routes(state);

        let written = TimeSeries {
            labels: vec![Label::new("__name__", "up"), Label::new("job", "api")],
            samples: vec![Sample {
                value: 1.0,
                timestamp: 5_000,
            }],
        };
        let body = encode_request(&WriteRequest {
            timeseries: vec![written.clone()],
        });
        let response = router
            .clone()
            .oneshot(post("/write", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(post("/read", read_body("up"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], SNAPPY_ENCODING);

        let decoded = decode_response(response).await;
        assert_eq!(decoded.results.len(), 1);
        assert_eq!(decoded.results[0].timeseries, vec![written]);
    }

    #[tokio::test]
    async fn test_read_requires_single_reader() {
        let mut state = duckdb_state().await;
        state.readers.push(Arc::new(FailingRemote));
        let telemetry = state.telemetry.clone();

        let response = routes(state)
            .oneshot(post("/read", read_body("up")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            telemetry
                .render()
                .unwrap()
                .contains("prombq_read_errors_total 1")
        );
    }

    #[tokio::test]
    async fn test_read_failure_is_server_error() {
        let mut state = duckdb_state().await;
        state.readers = vec![Arc::new(FailingRemote)];
        let telemetry = state.telemetry.clone();

        let response = routes(state)
            .oneshot(post("/read", read_body("up")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            telemetry
                .render()
                .unwrap()
                .contains("prombq_read_errors_total 1")
        );
    }

    #[tokio::test]
    async fn test_read_bad_body() {
        let state = duckdb_state().await;
        let response = routes(state)
            .oneshot(post("/read", b"garbage".to_vec()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
