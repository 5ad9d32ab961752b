// src/charts/mod.rs
//
// Builders for the `{labels, datasets}` shape the charting frontend consumes.
// Responsibility ends at producing that shape correctly aligned: every
// dataset's `data` is exactly as long as `labels`, with explicit zero-fill
// for missing categories.

use serde::Serialize;

use crate::models::{CampaignSplit, DailyCount, LabelCount, WeekdayCount};

pub const WEEKDAY_NAMES: [&str; 7] =
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

// Tailwind-ish series palette carried over from the frontend theme.
const SERIES_PALETTE: [&str; 7] =
    ["#3b82f6", "#22c55e", "#ef4444", "#f59e0b", "#6b7280", "#8b4513", "#a855f7"];

pub fn series_colours(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| SERIES_PALETTE[i % SERIES_PALETTE.len()].to_string())
        .collect()
}

/// Chart.js keeps camelCase dataset keys, hence the rename.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u64>,
    pub background_color: ColourSpec,
    pub border_color: ColourSpec,
}

/// Chart.js accepts either a single colour or one per slice.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ColourSpec {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

fn single_series(label: &str, data: Vec<u64>, colour_index: usize) -> Dataset {
    let colour = SERIES_PALETTE[colour_index % SERIES_PALETTE.len()].to_string();
    Dataset {
        label: label.to_string(),
        data,
        background_color: ColourSpec::One(colour.clone()),
        border_color: ColourSpec::One(colour),
    }
}

/// Bar chart over the seven weekdays, zero-filled from whatever buckets are
/// present.
pub fn build_weekday_chart(buckets: &[WeekdayCount], series_label: &str) -> ChartData {
    let data = (1..=7u32)
        .map(|weekday| {
            buckets
                .iter()
                .find(|b| b.weekday == weekday)
                .map(|b| b.count)
                .unwrap_or(0)
        })
        .collect();
    ChartData {
        labels: WEEKDAY_NAMES.iter().map(|n| n.to_string()).collect(),
        datasets: vec![single_series(series_label, data, 0)],
    }
}

/// Line chart over daily buckets in the order given (callers pass them
/// chronologically, zero-filled where a fixed window applies).
pub fn build_daily_chart(buckets: &[DailyCount], series_label: &str) -> ChartData {
    ChartData {
        labels: buckets.iter().map(|b| b.date.clone()).collect(),
        datasets: vec![single_series(series_label, buckets.iter().map(|b| b.count).collect(), 0)],
    }
}

/// Pie chart of label counts, one colour per slice.
pub fn build_label_chart(buckets: &[LabelCount], series_label: &str) -> ChartData {
    let colours = series_colours(buckets.len());
    ChartData {
        labels: buckets.iter().map(|b| b.label.clone()).collect(),
        datasets: vec![Dataset {
            label: series_label.to_string(),
            data: buckets.iter().map(|b| b.count).collect(),
            background_color: ColourSpec::Many(colours.clone()),
            border_color: ColourSpec::Many(colours),
        }],
    }
}

/// Campaign performance: one label list, two aligned datasets (total vs
/// positive replies).
pub fn build_campaign_chart(splits: &[CampaignSplit]) -> ChartData {
    ChartData {
        labels: splits.iter().map(|s| s.campaign_name.clone()).collect(),
        datasets: vec![
            single_series("Total Replies", splits.iter().map(|s| s.total_replies).collect(), 0),
            single_series("Positive Replies", splits.iter().map(|s| s.positive_replies).collect(), 1),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_aligned(chart: &ChartData) {
        for dataset in &chart.datasets {
            assert_eq!(dataset.data.len(), chart.labels.len(), "dataset {}", dataset.label);
        }
    }

    #[test]
    fn weekday_chart_zero_fills_to_seven() {
        let chart = build_weekday_chart(
            &[WeekdayCount { weekday: 3, count: 4 }, WeekdayCount { weekday: 7, count: 1 }],
            "Responses",
        );
        assert_aligned(&chart);
        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.datasets[0].data, vec![0, 0, 4, 0, 0, 0, 1]);
    }

    #[test]
    fn daily_chart_preserves_caller_order() {
        let buckets = vec![
            DailyCount { date: "2024-01-01".into(), channel: "email".into(), count: 2 },
            DailyCount { date: "2024-01-02".into(), channel: "email".into(), count: 0 },
            DailyCount { date: "2024-01-03".into(), channel: "email".into(), count: 5 },
        ];
        let chart = build_daily_chart(&buckets, "Daily");
        assert_aligned(&chart);
        assert_eq!(chart.labels, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(chart.datasets[0].data, vec![2, 0, 5]);
    }

    #[test]
    fn label_chart_gets_one_colour_per_slice() {
        let buckets = vec![
            LabelCount { label: "Interested".into(), count: 2, percent: 66.7 },
            LabelCount { label: "Not Interested".into(), count: 1, percent: 33.3 },
        ];
        let chart = build_label_chart(&buckets, "Response Labels");
        assert_aligned(&chart);
        match &chart.datasets[0].background_color {
            ColourSpec::Many(colours) => assert_eq!(colours.len(), 2),
            ColourSpec::One(_) => panic!("pie charts colour per slice"),
        }
    }

    #[test]
    fn campaign_chart_aligns_both_datasets() {
        let splits = vec![
            CampaignSplit {
                campaign_name: "Acme".into(),
                total_replies: 6,
                positive_replies: 4,
                negative_replies: 2,
                success_rate: 66.7,
            },
            CampaignSplit {
                campaign_name: "Zeta".into(),
                total_replies: 1,
                positive_replies: 0,
                negative_replies: 1,
                success_rate: 0.0,
            },
        ];
        let chart = build_campaign_chart(&splits);
        assert_aligned(&chart);
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].data, vec![6, 1]);
        assert_eq!(chart.datasets[1].data, vec![4, 0]);
    }

    #[test]
    fn palette_cycles_past_its_length() {
        let colours = series_colours(9);
        assert_eq!(colours.len(), 9);
        assert_eq!(colours[0], colours[7]);
    }
}
