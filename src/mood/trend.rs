//! Read-time aggregation over the mood entry collection.
//!
//! Everything here is pure: callers load the entries (and pick "today") and
//! pass them in.

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

use super::tally::SentimentTally;
use super::types::{MoodEntry, Sentiment};

/// Number of calendar days covered by [`rolling_trend`].
pub const TREND_DAYS: u64 = 7;

/// Dominant sentiment for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub sentiment: Sentiment,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentCount {
    pub sentiment: Sentiment,
    pub count: usize,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodSummary {
    pub total_entries: usize,
    pub total_sessions: usize,
    pub dominant: Option<Sentiment>,
    pub days_tracked: usize,
}

/// Today's date in the user's local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn tally_of<'a>(entries: impl Iterator<Item = &'a MoodEntry>) -> SentimentTally {
    let mut tally = SentimentTally::new();
    for entry in entries {
        tally.add_n(&entry.sentiment, entry.occurrence_count as usize);
    }
    tally
}

/// One point per day for the seven days ending at `today`, oldest first.
///
/// Days with no entries report the neutral label and a count of 0.
pub fn rolling_trend(entries: &[MoodEntry], today: NaiveDate) -> Vec<TrendPoint> {
    (0..TREND_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|day| {
            let tally = tally_of(entries.iter().filter(|e| e.day == day));
            let (sentiment, count) = tally.dominant_or_neutral();
            TrendPoint {
                day,
                sentiment,
                count,
            }
        })
        .collect()
}

/// Count of every sentiment across all entries, with no time bound.
///
/// Order is unspecified; callers sort or color-map on their own.
pub fn distribution(entries: &[MoodEntry]) -> Vec<SentimentCount> {
    tally_of(entries.iter())
        .into_counts()
        .into_iter()
        .map(|(sentiment, count)| SentimentCount { sentiment, count })
        .collect()
}

pub fn summarize(entries: &[MoodEntry], total_sessions: usize) -> MoodSummary {
    let tally = tally_of(entries.iter());
    let days: BTreeSet<NaiveDate> = entries.iter().map(|e| e.day).collect();
    MoodSummary {
        total_entries: entries.len(),
        total_sessions,
        dominant: tally.dominant().map(|(s, _)| s.clone()),
        days_tracked: days.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(day: NaiveDate, sentiment: Sentiment) -> MoodEntry {
        MoodEntry {
            day,
            sentiment,
            occurrence_count: 1,
            observed_at: Utc::now(),
            message_id: None,
        }
    }

    #[test]
    fn trend_of_empty_collection_is_seven_neutral_points() {
        let today = day(2026, 5, 10);
        let trend = rolling_trend(&[], today);

        assert_eq!(trend.len(), 7);
        assert!(trend
            .iter()
            .all(|p| p.count == 0 && p.sentiment == Sentiment::Normal));
        assert_eq!(trend[0].day, day(2026, 5, 4));
        assert_eq!(trend[6].day, today);
    }

    #[test]
    fn trend_reports_dominant_per_day() {
        let today = day(2026, 5, 10);
        let entries = vec![
            entry(today, Sentiment::Anxiety),
            entry(today, Sentiment::Anxiety),
            entry(today, Sentiment::Depression),
        ];
        let trend = rolling_trend(&entries, today);

        let last = &trend[6];
        assert_eq!(last.sentiment, Sentiment::Anxiety);
        assert_eq!(last.count, 2);
    }

    #[test]
    fn trend_ignores_entries_outside_the_window() {
        let today = day(2026, 5, 10);
        let entries = vec![
            entry(day(2026, 5, 3), Sentiment::Stress),
            entry(day(2026, 5, 4), Sentiment::Depression),
            entry(day(2026, 5, 11), Sentiment::Bipolar),
        ];
        let trend = rolling_trend(&entries, today);

        assert_eq!(trend[0].sentiment, Sentiment::Depression);
        assert_eq!(trend[0].count, 1);
        let counted: usize = trend.iter().map(|p| p.count).sum();
        assert_eq!(counted, 1);
    }

    #[test]
    fn trend_crosses_month_boundaries() {
        let today = day(2026, 3, 2);
        let trend = rolling_trend(&[], today);
        assert_eq!(trend[0].day, day(2026, 2, 24));
    }

    #[test]
    fn distribution_groups_all_entries() {
        let d = day(2026, 1, 1);
        let mut entries: Vec<MoodEntry> = (0..3).map(|_| entry(d, Sentiment::Anxiety)).collect();
        entries.push(entry(day(2025, 6, 1), Sentiment::Normal));

        let groups = distribution(&entries);
        assert_eq!(groups.len(), 2);
        let total: usize = groups.iter().map(|g| g.count).sum();
        assert_eq!(total, 4);

        let mut counts: Vec<usize> = groups.iter().map(|g| g.count).collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![1, 3]);
    }

    #[test]
    fn distribution_merges_unknown_labels_across_case() {
        let d = day(2026, 1, 1);
        let entries: Vec<MoodEntry> = ["grief", "Grief", "GRIEF"]
            .iter()
            .filter_map(|raw| Sentiment::parse(raw))
            .map(|s| entry(d, s))
            .collect();

        let groups = distribution(&entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sentiment, Sentiment::Other("Grief".into()));
        assert_eq!(groups[0].count, 3);
    }

    #[test]
    fn distribution_of_empty_collection_is_empty() {
        assert!(distribution(&[]).is_empty());
    }

    #[test]
    fn summary_counts_days_and_dominant() {
        let entries = vec![
            entry(day(2026, 1, 1), Sentiment::Stress),
            entry(day(2026, 1, 1), Sentiment::Stress),
            entry(day(2026, 1, 2), Sentiment::Normal),
        ];
        let summary = summarize(&entries, 4);

        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.total_sessions, 4);
        assert_eq!(summary.dominant, Some(Sentiment::Stress));
        assert_eq!(summary.days_tracked, 2);
        assert_eq!(summarize(&[], 0).dominant, None);
    }
}
