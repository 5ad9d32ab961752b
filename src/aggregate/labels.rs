// src/aggregate/labels.rs

use std::collections::BTreeMap;

use crate::models::{LabelCount, Response};

use super::{pct, UNKNOWN_LABEL};

/// Labels that count toward the success rate.
pub const POSITIVE_LABELS: [&str; 2] = ["Interested", "Referral"];

/// Labels that count as a firm no.
pub const NEGATIVE_LABELS: [&str; 4] =
    ["Do not contact", "Not Interested", "Out of office", "Wrong person"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

pub fn classify_label(label: &str) -> Sentiment {
    if POSITIVE_LABELS.contains(&label) {
        Sentiment::Positive
    } else if NEGATIVE_LABELS.contains(&label) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn classify_response(row: &Response) -> Sentiment {
    classify_label(row.response_label.as_deref().unwrap_or(UNKNOWN_LABEL))
}

/// Groups rows by response label, unlabeled rows under [`UNKNOWN_LABEL`].
/// Counts always sum to `rows.len()`. Output is label-ordered; callers sort
/// descending by count where a chart legend needs it.
pub fn aggregate_by_label(rows: &[Response]) -> Vec<LabelCount> {
    let total = rows.len() as u64;
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for row in rows {
        let label = row.response_label.as_deref().unwrap_or(UNKNOWN_LABEL);
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
            percent: pct(count, total),
        })
        .collect()
}
