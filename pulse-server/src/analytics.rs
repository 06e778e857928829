//! Client-side aggregation from the original dashboard, re-expressed as pure
//! functions over fetched record sets. Every value is recomputed from scratch
//! on each call; buckets are never adjusted incrementally.

use std::collections::BTreeMap;

use pulse_types::{Sentiment, SentimentDistribution, SentimentSample, TimelinePoint};

/// Round to two decimal places, matching the dashboard display contract.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reduce labelled samples into daily timeline buckets.
///
/// Buckets are keyed by UTC calendar day and emitted in ascending date
/// order. Only days with at least one sample appear; the range is never
/// zero-filled. Empty input yields an empty vec, not an error.
pub fn sentiment_timeline(samples: &[SentimentSample]) -> Vec<TimelinePoint> {
    let mut buckets: BTreeMap<chrono::NaiveDate, (i64, usize)> = BTreeMap::new();

    for sample in samples {
        let day = sample.created_at.date_naive();
        let bucket = buckets.entry(day).or_insert((0, 0));
        bucket.0 += sample.sentiment.score() as i64;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(date, (total, count))| TimelinePoint {
            date,
            label: date.format("%b %d").to_string(),
            average_sentiment: round2(total as f64 / count as f64),
            tweet_count: count,
        })
        .collect()
}

/// Count occurrences of each known label. Absent labels never reach this
/// function; callers filter them out when fetching.
pub fn sentiment_distribution(labels: &[Sentiment]) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();

    for label in labels {
        match label {
            Sentiment::Positive => dist.positive += 1,
            Sentiment::Negative => dist.negative += 1,
            Sentiment::Neutral => dist.neutral += 1,
        }
    }

    dist.total = dist.positive + dist.negative + dist.neutral;
    dist
}

/// Mean of the +1/-1/0 mapping across all labels, two decimals.
/// Empty input yields 0.0 for the overview card.
pub fn average_sentiment(labels: &[Sentiment]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let total: i64 = labels.iter().map(|s| s.score() as i64).sum();
    round2(total as f64 / labels.len() as f64)
}
