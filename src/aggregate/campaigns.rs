// src/aggregate/campaigns.rs

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Campaign, CampaignActivity, CampaignSplit, Response};

use super::labels::{classify_response, Sentiment};
use super::{parse_received_date, pct, UNKNOWN_LABEL};

/// Decorations the campaign tool appends when cloning or re-targeting a
/// campaign. Two backend rows differing only by one of these are the same
/// campaign as far as reporting goes.
const NAME_SUFFIXES: [&str; 2] = ["(catch_all)", "(copy)"];

/// Strips recognized trailing suffixes (all of them, so stacked clones like
/// `"Acme (copy) (copy)"` collapse too). Idempotent: stripping a stripped
/// name changes nothing.
pub fn strip_campaign_suffix(name: &str) -> String {
    let mut out = name.trim();
    loop {
        let mut stripped = false;
        for suffix in NAME_SUFFIXES {
            if let Some(rest) = out.strip_suffix(suffix) {
                out = rest.trim_end();
                stripped = true;
            }
        }
        if !stripped {
            break;
        }
    }
    out.to_string()
}

#[derive(Default, Clone, Copy)]
struct Tally {
    total: u64,
    positive: u64,
    negative: u64,
}

impl Tally {
    fn add(&mut self, row: &Response) {
        self.total += 1;
        match classify_response(row) {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => {}
        }
    }

    fn merge(&mut self, other: Tally) {
        self.total += other.total;
        self.positive += other.positive;
        self.negative += other.negative;
    }
}

/// Groups responses by campaign id, resolves each group's display name by
/// suffix stripping, then merges groups whose normalized name collides:
/// distinct backend ids can be one user-facing campaign, and their counts
/// must be summed, not listed separately. Sorted descending by total
/// replies. Response-driven: a campaign with zero responses never appears
/// here (see `campaign_activity` for the table-driven view).
pub fn aggregate_by_campaign(rows: &[Response]) -> Vec<CampaignSplit> {
    let mut by_id: BTreeMap<String, (String, Tally)> = BTreeMap::new();
    for row in rows {
        let id = row.campaign_id.map(|id| id.to_string()).unwrap_or_default();
        let name = row
            .campaign
            .as_ref()
            .map(|c| c.campaign_name.clone())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        let entry = by_id.entry(id).or_insert((name, Tally::default()));
        entry.1.add(row);
    }

    let mut by_name: BTreeMap<String, Tally> = BTreeMap::new();
    for (_, (name, tally)) in by_id {
        by_name.entry(strip_campaign_suffix(&name)).or_default().merge(tally);
    }

    let mut splits: Vec<CampaignSplit> = by_name
        .into_iter()
        .map(|(campaign_name, tally)| CampaignSplit {
            campaign_name,
            total_replies: tally.total,
            positive_replies: tally.positive,
            negative_replies: tally.negative,
            success_rate: pct(tally.positive, tally.total),
        })
        .collect();
    splits.sort_by(|a, b| {
        b.total_replies
            .cmp(&a.total_replies)
            .then_with(|| a.campaign_name.cmp(&b.campaign_name))
    });
    splits
}

#[derive(Default)]
struct ActivityWindow {
    total: u64,
    last_7: u64,
    last_30: u64,
    earliest: Option<NaiveDate>,
    latest: Option<NaiveDate>,
}

/// Response recency per campaign, seeded from the campaign table: campaigns
/// that never got a reply are listed with zero counts. Ordered by latest
/// response date, newest first, quiet campaigns last.
pub fn campaign_activity(
    campaigns: &[Campaign],
    responses: &[Response],
    today: NaiveDate,
) -> Vec<CampaignActivity> {
    let mut windows: HashMap<Uuid, ActivityWindow> = HashMap::new();
    for row in responses {
        let Some(id) = row.campaign_id else { continue };
        let window = windows.entry(id).or_default();
        window.total += 1;
        let Some(date) = parse_received_date(row) else { continue };
        let age = (today - date).num_days();
        if (0..7).contains(&age) {
            window.last_7 += 1;
        }
        if (0..30).contains(&age) {
            window.last_30 += 1;
        }
        window.earliest = Some(window.earliest.map_or(date, |d| d.min(date)));
        window.latest = Some(window.latest.map_or(date, |d| d.max(date)));
    }

    let mut activity: Vec<CampaignActivity> = campaigns
        .iter()
        .map(|campaign| {
            let window = windows.remove(&campaign.id).unwrap_or_default();
            CampaignActivity {
                id: campaign.id,
                campaign_name: campaign.campaign_name.clone(),
                sector: campaign.sector.clone(),
                is_active: campaign.is_active,
                total_responses: window.total,
                responses_last_7_days: window.last_7,
                responses_last_30_days: window.last_30,
                earliest_response_date: window.earliest.map(|d| d.format("%Y-%m-%d").to_string()),
                latest_response_date: window.latest.map(|d| d.format("%Y-%m-%d").to_string()),
            }
        })
        .collect();
    activity.sort_by(|a, b| {
        b.latest_response_date
            .cmp(&a.latest_response_date)
            .then_with(|| a.campaign_name.cmp(&b.campaign_name))
    });
    activity
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::aggregate::fixtures::{named, response};

    #[test]
    fn suffix_stripping_is_idempotent() {
        for name in ["Acme", "Acme (catch_all)", "Acme (copy)", "Acme (catch_all) (copy)", "  Acme  "] {
            let once = strip_campaign_suffix(name);
            assert_eq!(strip_campaign_suffix(&once), once, "not idempotent for {name:?}");
        }
        assert_eq!(strip_campaign_suffix("Acme (catch_all)"), "Acme");
        assert_eq!(strip_campaign_suffix("Acme (copy) (copy)"), "Acme");
        // a suffix in the middle of a name is part of the name
        assert_eq!(strip_campaign_suffix("Acme (copy) Outreach"), "Acme (copy) Outreach");
    }

    #[test]
    fn colliding_normalized_names_merge_into_one_split() {
        // campaign 1 "Acme (catch_all)" and campaign 2 "Acme": 3 replies each,
        // 2 positive each
        let mut rows = Vec::new();
        for lead in 0..3u128 {
            let label = if lead < 2 { "Interested" } else { "Not Interested" };
            rows.push(named(response(lead, 1, label, "2024-01-01"), "Acme (catch_all)"));
            rows.push(named(response(lead + 10, 2, label, "2024-01-01"), "Acme"));
        }
        let splits = aggregate_by_campaign(&rows);
        assert_eq!(splits.len(), 1);
        let acme = &splits[0];
        assert_eq!(acme.campaign_name, "Acme");
        assert_eq!(acme.total_replies, 6);
        assert_eq!(acme.positive_replies, 4);
        assert_eq!(acme.negative_replies, 2);
        assert_eq!(acme.success_rate, 66.7);
    }

    #[test]
    fn splits_sort_descending_by_total_replies() {
        let rows = vec![
            named(response(1, 1, "Interested", "2024-01-01"), "Small"),
            named(response(2, 2, "Interested", "2024-01-01"), "Big"),
            named(response(3, 2, "Referral", "2024-01-01"), "Big"),
        ];
        let splits = aggregate_by_campaign(&rows);
        assert_eq!(splits[0].campaign_name, "Big");
        assert_eq!(splits[1].campaign_name, "Small");
    }

    #[test]
    fn success_rate_stays_within_bounds() {
        let rows = vec![
            named(response(1, 1, "Out of office", "2024-01-01"), "Quiet"),
            named(response(2, 2, "Interested", "2024-01-01"), "Keen"),
        ];
        for split in aggregate_by_campaign(&rows) {
            assert!((0.0..=100.0).contains(&split.success_rate));
        }
    }

    #[test]
    fn rows_without_campaign_relation_group_under_unknown() {
        let rows = vec![response(1, 1, "Interested", "2024-01-01")];
        let splits = aggregate_by_campaign(&rows);
        assert_eq!(splits[0].campaign_name, UNKNOWN_LABEL);
    }

    fn campaign(id: u128, name: &str) -> Campaign {
        Campaign {
            id: Uuid::from_u128(id),
            campaign_name: name.into(),
            sector: None,
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn activity_lists_zero_activity_campaigns() {
        let campaigns = vec![campaign(1, "Busy"), campaign(2, "Silent")];
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let responses = vec![
            response(1, 1, "Interested", "2024-01-09"),
            response(2, 1, "Referral", "2023-12-20"),
        ];
        let activity = campaign_activity(&campaigns, &responses, today);
        assert_eq!(activity.len(), 2);
        let busy = &activity[0];
        assert_eq!(busy.campaign_name, "Busy");
        assert_eq!(busy.total_responses, 2);
        assert_eq!(busy.responses_last_7_days, 1);
        assert_eq!(busy.responses_last_30_days, 2);
        assert_eq!(busy.earliest_response_date.as_deref(), Some("2023-12-20"));
        assert_eq!(busy.latest_response_date.as_deref(), Some("2024-01-09"));
        // the quiet campaign still shows, zeroed, after the active one
        let silent = &activity[1];
        assert_eq!(silent.campaign_name, "Silent");
        assert_eq!(silent.total_responses, 0);
        assert!(silent.latest_response_date.is_none());
    }
}
