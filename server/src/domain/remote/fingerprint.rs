//! Series fingerprint
//!
//! Content hash over a label set, used only as a grouping key while merging
//! one read. It is not persisted and not stable across releases.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use super::prompb::Label;

const SEPARATOR: u8 = 0xff;

/// Hash labels that are already sorted by name
pub fn fingerprint(sorted_labels: &[Label]) -> u64 {
    let mut hasher = FxHasher::default();
    for label in sorted_labels {
        hasher.write(label.name.as_bytes());
        hasher.write_u8(SEPARATOR);
        hasher.write(label.value.as_bytes());
        hasher.write_u8(SEPARATOR);
    }
    hasher.finish()
}
