use std::time::Instant;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::api::{ApiRow, QueryRequest, SearchAnalytics};
use crate::config::ROW_LIMIT;
use crate::stats::{KeywordTable, MetricRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Pages,
    Keywords,
}

impl QueryKind {
    fn component(self) -> &'static str {
        match self {
            QueryKind::Pages => "page_metrics",
            QueryKind::Keywords => "keyword_metrics",
        }
    }

    /// Printed to the operator when the query fails.
    fn failure_message(self) -> &'static str {
        match self {
            QueryKind::Pages => "Erro ao buscar métricas",
            QueryKind::Keywords => "Erro ao buscar métricas de palavras-chave",
        }
    }
}

fn build_request(start: NaiveDate, end: NaiveDate, dimensions: &[&str]) -> QueryRequest {
    QueryRequest {
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: end.format("%Y-%m-%d").to_string(),
        dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
        row_limit: ROW_LIMIT,
    }
}

// The API reports clicks and impressions as JSON numbers
fn as_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Runs one query, turning every failure into "no rows".
fn query_rows(
    api: &dyn SearchAnalytics,
    site: &str,
    request: &QueryRequest,
    kind: QueryKind,
) -> Vec<ApiRow> {
    let start_time = Instant::now();
    let component = kind.component();

    match api.query(site, request) {
        Ok(response) => {
            let rows = response.rows.unwrap_or_default();
            info!(action = "complete", component = component, row_count = rows.len(), start_date = %request.start_date, end_date = %request.end_date, duration_ms = start_time.elapsed().as_millis(), "Query completed");
            rows
        }
        Err(e) => {
            println!("{}: {}", kind.failure_message(), e);
            error!(action = "fail", component = component, error = %e, start_date = %request.start_date, end_date = %request.end_date, "Query failed, continuing with no rows");
            Vec::new()
        }
    }
}

/// Per-page metrics for `[start, end]`, at most [`ROW_LIMIT`] rows.
pub fn fetch_page_metrics(
    api: &dyn SearchAnalytics,
    site: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<MetricRow> {
    let request = build_request(start, end, &["page"]);

    query_rows(api, site, &request, QueryKind::Pages)
        .into_iter()
        .filter_map(|row| {
            let Some(url) = row.keys.into_iter().next() else {
                warn!(action = "skip", component = "page_metrics", "Row without page key");
                return None;
            };
            Some(MetricRow {
                url,
                clicks: as_count(row.clicks),
                impressions: as_count(row.impressions),
                ctr: row.ctr,
                position: row.position,
            })
        })
        .collect()
}

/// Query+page metrics for `[start, end]`, grouped by query.
///
/// CTR and position are plain means over the rows of each keyword,
/// not weighted by impressions.
pub fn fetch_keyword_metrics(
    api: &dyn SearchAnalytics,
    site: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> KeywordTable {
    let request = build_request(start, end, &["query", "page"]);
    let rows = query_rows(api, site, &request, QueryKind::Keywords);
    group_keyword_rows(rows)
}

pub fn group_keyword_rows(rows: Vec<ApiRow>) -> KeywordTable {
    let mut keywords = KeywordTable::new();

    for row in rows {
        let mut keys = row.keys.into_iter();
        let (Some(keyword), Some(url)) = (keys.next(), keys.next()) else {
            warn!(action = "skip", component = "keyword_metrics", "Row without query and page keys");
            continue;
        };

        let entry = keywords.get_or_insert_default(&keyword);
        entry.clicks += as_count(row.clicks);
        entry.impressions += as_count(row.impressions);
        entry.ctr += row.ctr;
        entry.position += row.position;
        entry.urls.push(url);
    }

    for entry in keywords.values_mut() {
        let contributors = entry.urls.len() as f64;
        entry.ctr /= contributors;
        entry.position /= contributors;
    }

    info!(action = "group", component = "keyword_metrics", keyword_count = keywords.len(), "Grouped rows by keyword");
    keywords
}
