//! Day-of-week and hour-of-day activity histograms.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Frequency tables over posting instants. Day indices are Sunday-first to
/// match the stored schema; hours are UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityHistogram {
    pub day_counts: [u64; 7],
    pub hour_counts: [u64; 24],
}

/// Bucket a sequence of resolved instants. Items without a usable timestamp
/// never reach this function; they are excluded upstream rather than
/// defaulted to some arbitrary instant.
pub fn build(timestamps: &[DateTime<Utc>]) -> ActivityHistogram {
    let mut histogram = ActivityHistogram::default();

    for timestamp in timestamps {
        histogram.day_counts[timestamp.weekday().num_days_from_sunday() as usize] += 1;
        histogram.hour_counts[timestamp.hour() as usize] += 1;
    }

    histogram
}

/// Index of the first maximum. Replacement requires a strict increase, so
/// ties resolve to the lowest index.
pub fn mode(counts: &[u64]) -> usize {
    let mut best_index = 0;
    let mut best_count = 0;

    for (index, &count) in counts.iter().enumerate() {
        if count > best_count {
            best_count = count;
            best_index = index;
        }
    }

    best_index
}
