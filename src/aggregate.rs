use crate::domain::trail_of;
use crate::stats::{ComparisonEntry, ComparisonTable, KeywordAggregate, KeywordTable, MetricRow, TrailCounts};

/// Field of a [`ComparisonEntry`] used to rank URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComparisonKey {
    #[default]
    CurrentClicks,
    PreviousClicks,
}

impl ComparisonKey {
    fn value(self, entry: &ComparisonEntry) -> u64 {
        match self {
            ComparisonKey::CurrentClicks => entry.current_clicks,
            ComparisonKey::PreviousClicks => entry.previous_clicks,
        }
    }
}

/// Outer join of the two windows on URL.
///
/// A URL listed twice in the same window keeps its last row.
pub fn compare_windows(current: &[MetricRow], previous: &[MetricRow]) -> ComparisonTable {
    let mut table = ComparisonTable::new();

    for row in current {
        table.insert(
            row.url.clone(),
            ComparisonEntry {
                current_clicks: row.clicks,
                current_impressions: row.impressions,
                current_ctr: row.ctr,
                current_position: row.position,
                ..ComparisonEntry::default()
            },
        );
    }

    for row in previous {
        let entry = table.get_or_insert_default(&row.url);
        entry.previous_clicks = row.clicks;
        entry.previous_impressions = row.impressions;
        entry.previous_ctr = row.ctr;
        entry.previous_position = row.position;
    }

    table
}

/// Signed change from `previous` to `current`, e.g. `+50.00%`.
///
/// A zero baseline has no defined ratio; any growth from it is reported as
/// `+100%` and no growth as `0%`.
pub fn percentage_change(current: f64, previous: f64) -> String {
    if previous == 0.0 {
        return if current > 0.0 {
            "+100%".to_string()
        } else {
            "0%".to_string()
        };
    }

    let change = (current - previous) / previous * 100.0;
    if change > 0.0 {
        format!("+{:.2}%", change)
    } else {
        format!("{:.2}%", change)
    }
}

pub fn group_by_trail<'a, I>(urls: I) -> TrailCounts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut trails = TrailCounts::new();
    for url in urls {
        if let Some(trail) = trail_of(url) {
            *trails.get_or_insert_default(&trail) += 1;
        }
    }
    trails
}

/// The `n` URLs with the largest `key`, ties left in table order.
pub fn top_n(table: &ComparisonTable, n: usize, key: ComparisonKey) -> Vec<(&str, &ComparisonEntry)> {
    let mut ranked: Vec<(&str, &ComparisonEntry)> = table.iter().collect();
    ranked.sort_by(|a, b| key.value(b.1).cmp(&key.value(a.1)));
    ranked.truncate(n);
    ranked
}

pub fn top_keywords(keywords: &KeywordTable, n: usize) -> Vec<(&str, &KeywordAggregate)> {
    let mut ranked: Vec<(&str, &KeywordAggregate)> = keywords.iter().collect();
    ranked.sort_by(|a, b| b.1.clicks.cmp(&a.1.clicks));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn metric(url: &str, clicks: u64) -> MetricRow {
        MetricRow {
            url: url.to_string(),
            clicks,
            impressions: clicks * 10,
            ctr: 0.1,
            position: 5.0,
        }
    }

    #[test]
    fn test_percentage_change_zero_baseline() {
        assert_eq!(percentage_change(0.0, 0.0), "0%");
        assert_eq!(percentage_change(5.0, 0.0), "+100%");
    }

    #[test]
    fn test_percentage_change_two_decimals() {
        assert_eq!(percentage_change(150.0, 100.0), "+50.00%");
        assert_eq!(percentage_change(50.0, 100.0), "-50.00%");
        assert_eq!(percentage_change(100.0, 100.0), "0.00%");
        assert_eq!(percentage_change(1.0, 3.0), "-66.67%");
    }

    #[test]
    fn test_compare_windows_union() {
        let current = vec![metric("https://example.com/a", 5), metric("https://example.com/b", 3)];
        let previous = vec![metric("https://example.com/b", 7), metric("https://example.com/c", 1)];

        let table = compare_windows(&current, &previous);

        let keys: HashSet<&str> = table.keys().collect();
        let expected: HashSet<&str> = ["https://example.com/a", "https://example.com/b", "https://example.com/c"]
            .into_iter()
            .collect();
        assert_eq!(keys, expected);
        assert_eq!(table.len(), 3);

        let b = table.get("https://example.com/b").unwrap();
        assert_eq!((b.current_clicks, b.previous_clicks), (3, 7));

        let c = table.get("https://example.com/c").unwrap();
        assert_eq!(c.current_clicks, 0);
        assert_eq!(c.current_position, 0.0);
        assert_eq!(c.previous_clicks, 1);

        let a = table.get("https://example.com/a").unwrap();
        assert_eq!(a.previous_impressions, 0);
    }

    #[test]
    fn test_compare_windows_order() {
        let current = vec![metric("https://example.com/b", 1), metric("https://example.com/a", 1)];
        let previous = vec![metric("https://example.com/c", 1), metric("https://example.com/a", 1)];

        let table = compare_windows(&current, &previous);
        assert_eq!(
            table.keys().collect::<Vec<_>>(),
            vec!["https://example.com/b", "https://example.com/a", "https://example.com/c"]
        );
    }

    #[test]
    fn test_compare_windows_duplicates_last_wins() {
        let current = vec![metric("https://example.com/a", 1), metric("https://example.com/a", 9)];
        let previous = vec![metric("https://example.com/a", 2), metric("https://example.com/a", 4)];

        let table = compare_windows(&current, &previous);
        assert_eq!(table.len(), 1);
        let a = table.get("https://example.com/a").unwrap();
        assert_eq!((a.current_clicks, a.previous_clicks), (9, 4));
    }

    #[test]
    fn test_group_by_trail() {
        let urls = [
            "https://example.com/blog/post1",
            "https://example.com/blog/post2",
            "https://example.com/shop/item",
        ];

        let trails = group_by_trail(urls);
        let counts: Vec<(&str, u32)> = trails.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(counts, vec![("/blog/", 2), ("/shop/", 1)]);
    }

    #[test]
    fn test_group_by_trail_skips_bare_host() {
        let trails = group_by_trail(["https://example.com", "https://example.com/blog/x"]);
        assert_eq!(trails.len(), 1);
        assert_eq!(trails.get("/blog/"), Some(&1));
    }

    #[test]
    fn test_top_n_empty() {
        let table = ComparisonTable::new();
        assert!(top_n(&table, 10, ComparisonKey::CurrentClicks).is_empty());
    }

    #[test]
    fn test_top_n_descending_and_stable() {
        let current = vec![
            metric("https://example.com/a", 2),
            metric("https://example.com/b", 8),
            metric("https://example.com/c", 2),
            metric("https://example.com/d", 5),
        ];
        let table = compare_windows(&current, &[]);

        let top: Vec<&str> = top_n(&table, 3, ComparisonKey::default())
            .into_iter()
            .map(|(url, _)| url)
            .collect();
        assert_eq!(
            top,
            vec!["https://example.com/b", "https://example.com/d", "https://example.com/a"]
        );
    }

    #[test]
    fn test_top_n_by_previous_clicks() {
        let previous = vec![metric("https://example.com/a", 1), metric("https://example.com/b", 4)];
        let table = compare_windows(&[], &previous);

        let top = top_n(&table, 1, ComparisonKey::PreviousClicks);
        assert_eq!(top[0].0, "https://example.com/b");
    }

    #[test]
    fn test_top_keywords() {
        let mut keywords = KeywordTable::new();
        keywords.get_or_insert_default("low").clicks = 1;
        keywords.get_or_insert_default("high").clicks = 9;
        keywords.get_or_insert_default("tie").clicks = 1;

        let top: Vec<&str> = top_keywords(&keywords, 10).into_iter().map(|(k, _)| k).collect();
        assert_eq!(top, vec!["high", "low", "tie"]);
    }
}
