// src/aggregate/buckets.rs

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{DailyCount, Response, WeekdayCount};

use super::parse_received_date;

/// Monday=1 .. Sunday=7. The upstream day-of-week convention hands Sunday
/// back as 0, which charts want remapped to 7.
fn weekday_index(date: NaiveDate) -> u32 {
    match date.weekday().num_days_from_sunday() {
        0 => 7,
        n => n,
    }
}

/// Groups rows into per-weekday counts. Output always has exactly 7 entries
/// ordered 1..=7, zero-filled. Rows with missing or malformed dates are
/// skipped here (they still count in totals elsewhere).
pub fn bucket_by_weekday(rows: &[Response]) -> Vec<WeekdayCount> {
    let mut counts = [0u64; 7];
    for row in rows {
        let Some(date) = parse_received_date(row) else { continue };
        counts[(weekday_index(date) - 1) as usize] += 1;
    }
    (1..=7)
        .map(|weekday| WeekdayCount { weekday, count: counts[(weekday - 1) as usize] })
        .collect()
}

/// Groups rows into per-day counts keyed by `(date, channel)`, ascending by
/// date. Rows without a parseable date are skipped.
pub fn bucket_by_date(rows: &[Response]) -> Vec<DailyCount> {
    let mut by_day: BTreeMap<(String, String), u64> = BTreeMap::new();
    for row in rows {
        let Some(date) = parse_received_date(row) else { continue };
        let key = (date.format("%Y-%m-%d").to_string(), row.channel.clone());
        *by_day.entry(key).or_insert(0) += 1;
    }
    by_day
        .into_iter()
        .map(|((date, channel), count)| DailyCount { date, channel, count })
        .collect()
}

/// Expands daily buckets into the fixed trailing 7-day window ending at
/// `today`, zero-filling days without data. Used by the past-week chart, so
/// the output is always exactly 7 entries in chronological order.
pub fn fill_trailing_week(buckets: &[DailyCount], today: NaiveDate, channel: &str) -> Vec<DailyCount> {
    (0..7)
        .rev()
        .map(|back| {
            let date = (today - Duration::days(back)).format("%Y-%m-%d").to_string();
            let count = buckets.iter().filter(|b| b.date == date).map(|b| b.count).sum();
            DailyCount { date, channel: channel.to_string(), count }
        })
        .collect()
}
