//! Result merger
//!
//! Folds warehouse rows from every query of one read into series. Rows are
//! grouped by the fingerprint of their rebuilt label set; identical label
//! sets coming from different queries land in the same series.

use rustc_hash::FxHashMap;

use super::codec::decode_tags;
use super::error::RemoteStorageError;
use super::fingerprint::fingerprint;
use super::prompb::{Label, METRIC_NAME_LABEL, Sample, TimeSeries};
use crate::data::StoredRecord;

/// Accumulator scoped to a single read call
#[derive(Debug, Default)]
pub struct SeriesMerger {
    /// Fingerprint to candidate positions in `series` (more than one on collision)
    index: FxHashMap<u64, Vec<usize>>,
    series: Vec<TimeSeries>,
    out_of_order: usize,
}

impl SeriesMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the rows of one query into the accumulated series
    ///
    /// A row with malformed tags fails the whole merge.
    pub fn push_rows(&mut self, rows: Vec<StoredRecord>) -> Result<(), RemoteStorageError> {
        for row in rows {
            self.push_row(row)?;
        }
        Ok(())
    }

    fn push_row(&mut self, row: StoredRecord) -> Result<(), RemoteStorageError> {
        let mut labels = decode_tags(&row.tags)?;
        // The metricname column wins over a stray __name__ key in tags
        labels.insert(METRIC_NAME_LABEL.to_string(), row.metric_name);
        let labels: Vec<Label> = labels
            .into_iter()
            .map(|(name, value)| Label { name, value })
            .collect();

        let sample = Sample {
            value: row.value,
            timestamp: row.timestamp_ms,
        };

        let fp = fingerprint(&labels);
        let candidates = self.index.entry(fp).or_default();
        let position = candidates
            .iter()
            .copied()
            .find(|&i| self.series[i].labels == labels);

        match position {
            Some(i) => {
                let samples = &mut self.series[i].samples;
                if samples
                    .last()
                    .is_some_and(|last| last.timestamp > sample.timestamp)
                {
                    self.out_of_order += 1;
                }
                samples.push(sample);
            }
            None => {
                candidates.push(self.series.len());
                self.series.push(TimeSeries {
                    labels,
                    samples: vec![sample],
                });
            }
        }
        Ok(())
    }

    /// Series in first-seen order, labels sorted by name
    pub fn finish(self) -> Vec<TimeSeries> {
        if self.out_of_order > 0 {
            tracing::debug!(
                out_of_order = self.out_of_order,
                series = self.series.len(),
                "Merged samples arrived out of timestamp order"
            );
        }
        self.series
    }
}

/// Merge the rows of every query of one read into series
pub fn merge<I>(results: I) -> Result<Vec<TimeSeries>, RemoteStorageError>
where
    I: IntoIterator<Item = Vec<StoredRecord>>,
{
    let mut merger = SeriesMerger::new();
    for rows in results {
        merger.push_rows(rows)?;
    }
    Ok(merger.finish())
}
