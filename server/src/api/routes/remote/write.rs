//! Remote write endpoint

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::RemoteState;
use super::encoding::{decode_request, internal_error};
use crate::core::telemetry::Telemetry;
use crate::domain::remote::RemoteWriter;
use crate::domain::remote::prompb::{TimeSeries, WriteRequest};

pub async fn write(State(state): State<RemoteState>, body: Bytes) -> Response {
    let start = Instant::now();

    let request: WriteRequest = match decode_request(&body) {
        Ok(req) => req,
        Err(e) => {
            state.telemetry.write_failed();
            return e.into_response();
        }
    };

    let samples: usize = request.timeseries.iter().map(|ts| ts.samples.len()).sum();
    state.telemetry.samples_received(samples as u64);
    tracing::debug!(
        series = request.timeseries.len(),
        samples,
        "Received remote write"
    );

    let results = futures::future::join_all(state.writers.iter().map(|writer| {
        send_samples(
            writer.as_ref(),
            &request.timeseries,
            samples,
            &state.telemetry,
        )
    }))
    .await;

    if let Some(writer) = state.writers.first() {
        state
            .telemetry
            .observe_write_api(writer.name(), start.elapsed());
    }

    if results.into_iter().all(|ok| ok) {
        StatusCode::OK.into_response()
    } else {
        internal_error()
    }
}

/// Hand the series to one writer and record the outcome
async fn send_samples(
    writer: &dyn RemoteWriter,
    series: &[TimeSeries],
    samples: usize,
    telemetry: &Telemetry,
) -> bool {
    let start = Instant::now();
    match writer.write(series).await {
        Ok(written) => {
            telemetry.batch_sent(writer.name(), written as u64, start.elapsed());
            true
        }
        Err(e) => {
            tracing::warn!(
                remote = writer.name(),
                samples,
                error = %e,
                "Error sending samples to remote storage"
            );
            telemetry.batch_failed(writer.name(), samples as u64);
            false
        }
    }
}
