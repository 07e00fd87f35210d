use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{error, info, warn};

use crate::aggregate::{compare_windows, group_by_trail};
use crate::api::SearchAnalytics;
use crate::config::{Config, WINDOW_DAYS};
use crate::fetch::{fetch_keyword_metrics, fetch_page_metrics};
use crate::report::{build_report, next_sequence_number, report_file_name, write_xlsx};
use crate::stats::AnalysisResult;
use crate::utils::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// The window ending today and the adjacent one before it.
pub fn comparison_windows(today: NaiveDate, days: i64) -> (DateWindow, DateWindow) {
    let current = DateWindow {
        start: today - Duration::days(days),
        end: today,
    };
    let previous = DateWindow {
        start: today - Duration::days(days * 2),
        end: today - Duration::days(days + 1),
    };
    (current, previous)
}

/// Fetches both windows and aggregates them.
///
/// Returns `None` when neither window has any pages.
pub fn analyze_site(
    api: &dyn SearchAnalytics,
    site: &str,
    config: &Config,
    now: NaiveDateTime,
) -> Option<AnalysisResult> {
    let start_time = Instant::now();
    info!(action = "start", component = "analysis", site = site, "Starting Search Console analysis");

    let (current, previous) = comparison_windows(now.date(), WINDOW_DAYS);
    info!(
        action = "configure",
        component = "analysis",
        current_start = %current.start,
        current_end = %current.end,
        previous_start = %previous.start,
        previous_end = %previous.end,
        "Comparison windows"
    );

    let current_rows = fetch_page_metrics(api, site, current.start, current.end);
    let previous_rows = fetch_page_metrics(api, site, previous.start, previous.end);

    let comparison = compare_windows(&current_rows, &previous_rows);
    if comparison.is_empty() {
        warn!(action = "complete", component = "analysis", "No pages in either window");
        return None;
    }

    let trails = group_by_trail(comparison.keys());
    let keywords = fetch_keyword_metrics(api, site, current.start, current.end);

    info!(
        action = "complete",
        component = "analysis",
        url_count = comparison.len(),
        trail_count = trails.len(),
        keyword_count = keywords.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Analysis completed"
    );

    Some(AnalysisResult {
        site: site.to_string(),
        generated_at: now,
        comparison,
        trails,
        keywords,
    })
}

pub fn print_analysis_results(result: &AnalysisResult) {
    let total = result.comparison.len() as u64;

    println!(
        "\n--- Relatório Analítico de Indexação (Comparação Últimos {} Dias) ---",
        WINDOW_DAYS
    );
    println!("Site: {}", result.site);
    println!(
        "Data de Execução: {}",
        result.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("Total de URLs Indexadas Encontradas: {}", format_number(total));
    println!("Taxa de Indexação: {} URLs indexadas", format_number(total));

    println!("\n--- URLs Indexadas por Trilha ---");
    for (trail, count) in result.trails.iter() {
        println!("{}: {} páginas indexadas", trail, format_number(u64::from(*count)));
    }
    println!("-----------------------------------------\n");
}

/// Runs one full report and returns the path written, if any.
///
/// Only a failure to inspect the output directory is an error; failed
/// queries and a failed write both end the run quietly.
pub fn run_report(
    api: &dyn SearchAnalytics,
    site: &str,
    config: &Config,
    now: NaiveDateTime,
) -> Result<Option<PathBuf>> {
    let Some(result) = analyze_site(api, site, config, now) else {
        println!("Nenhuma URL indexada encontrada.");
        return Ok(None);
    };

    print_analysis_results(&result);

    let sequence = next_sequence_number(&config.output_dir).with_context(|| {
        format!(
            "Failed to scan output directory {:?}",
            config.output_dir
        )
    })?;
    let output_file = config
        .output_dir
        .join(report_file_name(sequence, result.generated_at));

    let report = build_report(&result, config.index_queries);
    match write_xlsx(&report, &output_file) {
        Ok(()) => {
            println!(
                "\nRelatório de URLs e palavras-chave salvo em: {}",
                output_file.display()
            );
            Ok(Some(output_file))
        }
        Err(e) => {
            println!("Erro ao salvar as URLs e palavras-chave no arquivo: {}", e);
            error!(action = "fail", component = "report_writer", path = ?output_file, error = %e, "Failed to write report");
            Ok(None)
        }
    }
}
