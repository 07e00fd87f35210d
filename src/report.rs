use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::NaiveDateTime;
use regex::Regex;
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::aggregate::{percentage_change, top_keywords, top_n, ComparisonKey};
use crate::config::{REPORT_PREFIX, TOP_COUNT, WINDOW_DAYS};
use crate::domain::site_query;
use crate::error::ReportError;
use crate::stats::{AnalysisResult, KeywordAggregate};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    fn append<I, C>(&mut self, row: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

impl Report {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

pub const SUMMARY_SHEET: &str = "Resumo";
pub const URLS_SHEET: &str = "URLs Indexadas";
pub const TRAILS_SHEET: &str = "URLs por Trilha";
pub const TOP_URLS_SHEET: &str = "Melhores URLs";
pub const KEYWORDS_SHEET: &str = "Palavras-Chave Indexadas";
pub const TOP_KEYWORDS_SHEET: &str = "Melhores Palavras-Chave";
pub const SITE_QUERIES_SHEET: &str = "Consultas Site";

const KEYWORD_HEADER: [&str; 6] = [
    "Palavra-Chave",
    "Cliques",
    "Impressões",
    "CTR",
    "Posição Média",
    "URLs Associadas",
];

pub fn format_ctr(ctr: f64) -> String {
    format!("{:.2}%", ctr * 100.0)
}

pub fn format_position(position: f64) -> String {
    format!("{:.2}", position)
}

fn keyword_row(keyword: &str, data: &KeywordAggregate) -> Vec<Cell> {
    let mut row = vec![
        Cell::from(keyword),
        Cell::from(data.clicks),
        Cell::from(data.impressions),
        Cell::from(format_ctr(data.ctr)),
        Cell::from(format_position(data.position)),
    ];
    row.extend(data.urls.iter().map(|url| Cell::from(url.as_str())));
    row
}

/// Lays out every sheet of the report; nothing is written to disk here.
pub fn build_report(result: &AnalysisResult, index_queries: bool) -> Report {
    let timestamp = result.generated_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let mut sheets = Vec::new();

    let mut summary = Sheet::new(SUMMARY_SHEET);
    summary.append(["Resumo da Indexação"]);
    summary.append([Cell::from("Data de Execução"), Cell::from(timestamp)]);
    summary.append([
        Cell::from("Total de URLs Indexadas"),
        Cell::from(result.comparison.len()),
    ]);
    summary.append(["Taxa de Indexação"]);
    for (trail, count) in result.trails.iter() {
        summary.append([trail.to_string(), format!("{} páginas indexadas", count)]);
    }
    sheets.push(summary);

    let current = format!("(Últimos {} Dias)", WINDOW_DAYS);
    let previous = format!("({} Dias Anteriores)", WINDOW_DAYS);

    let mut urls = Sheet::new(URLS_SHEET);
    let mut header = vec![Cell::from("URL")];
    for metric in ["Cliques", "Impressões", "CTR", "Posição Média"] {
        header.push(Cell::from(format!("{} {}", metric, current)));
        header.push(Cell::from(format!("{} {}", metric, previous)));
        let evolution = match metric {
            "Posição Média" => "Posição",
            other => other,
        };
        header.push(Cell::from(format!("Evolução de {}", evolution)));
    }
    urls.rows.push(header);
    for (url, data) in result.comparison.iter() {
        urls.append([
            Cell::from(url),
            Cell::from(data.current_clicks),
            Cell::from(data.previous_clicks),
            Cell::from(percentage_change(
                data.current_clicks as f64,
                data.previous_clicks as f64,
            )),
            Cell::from(data.current_impressions),
            Cell::from(data.previous_impressions),
            Cell::from(percentage_change(
                data.current_impressions as f64,
                data.previous_impressions as f64,
            )),
            Cell::from(format_ctr(data.current_ctr)),
            Cell::from(format_ctr(data.previous_ctr)),
            Cell::from(percentage_change(data.current_ctr, data.previous_ctr)),
            Cell::from(format_position(data.current_position)),
            Cell::from(format_position(data.previous_position)),
            // Lower position is better, so the arguments are swapped
            Cell::from(percentage_change(data.previous_position, data.current_position)),
        ]);
    }
    sheets.push(urls);

    let mut trails = Sheet::new(TRAILS_SHEET);
    trails.append(["Trilha", "Quantidade de Páginas Indexadas"]);
    for (trail, count) in result.trails.iter() {
        trails.append([Cell::from(trail), Cell::from(*count)]);
    }
    sheets.push(trails);

    let mut top_urls = Sheet::new(TOP_URLS_SHEET);
    top_urls.append([
        "URL".to_string(),
        format!("Cliques {}", current),
        format!("Impressões {}", current),
        "CTR".to_string(),
        "Posição Média".to_string(),
    ]);
    for (url, data) in top_n(&result.comparison, TOP_COUNT, ComparisonKey::CurrentClicks) {
        top_urls.append([
            Cell::from(url),
            Cell::from(data.current_clicks),
            Cell::from(data.current_impressions),
            Cell::from(format_ctr(data.current_ctr)),
            Cell::from(format_position(data.current_position)),
        ]);
    }
    sheets.push(top_urls);

    let mut keywords = Sheet::new(KEYWORDS_SHEET);
    keywords.append(KEYWORD_HEADER);
    for (keyword, data) in result.keywords.iter() {
        keywords.rows.push(keyword_row(keyword, data));
    }
    sheets.push(keywords);

    let mut top = Sheet::new(TOP_KEYWORDS_SHEET);
    top.append(KEYWORD_HEADER);
    for (keyword, data) in top_keywords(&result.keywords, TOP_COUNT) {
        top.rows.push(keyword_row(keyword, data));
    }
    sheets.push(top);

    if index_queries {
        let mut queries = Sheet::new(SITE_QUERIES_SHEET);
        queries.append(["URL", "Consulta"]);
        for url in result.comparison.keys() {
            queries.append([url.to_string(), site_query(url)]);
        }
        sheets.push(queries);
    }

    Report { sheets }
}

pub fn write_xlsx(report: &Report, path: &Path) -> Result<(), ReportError> {
    let start_time = Instant::now();
    let mut workbook = Workbook::new();

    for sheet in &report.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_idx = row_idx as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_idx = col_idx as u16;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_idx, col_idx, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row_idx, col_idx, *number)?;
                    }
                }
            }
        }
    }

    workbook.save(path)?;
    info!(action = "complete", component = "report_writer", path = ?path, sheet_count = report.sheets.len(), duration_ms = start_time.elapsed().as_millis(), "Report written");
    Ok(())
}

/// One more than the highest sequence number among earlier reports in `dir`.
///
/// Saturates at `u64::MAX` rather than wrapping.
pub fn next_sequence_number(dir: &Path) -> Result<u64, ReportError> {
    let pattern = Regex::new(&format!(r"^{}(\d+)_.*\.xlsx$", regex::escape(REPORT_PREFIX)))?;

    let mut highest: Option<u64> = None;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(number) = pattern
            .captures(name)
            .and_then(|c| c.get(1))
            // all digits, so parsing only fails past u64::MAX
            .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        else {
            continue;
        };
        highest = Some(highest.map_or(number, |h| h.max(number)));
    }

    Ok(highest.map_or(1, |h| h.saturating_add(1)))
}

pub fn report_file_name(sequence: u64, generated_at: NaiveDateTime) -> String {
    format!(
        "{}{}_{}.xlsx",
        REPORT_PREFIX,
        sequence,
        generated_at.format("%Y-%m-%d_%H-%M-%S")
    )
}
