pub mod aggregate;
pub mod api;
pub mod args;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod utils;

pub use api::{SearchAnalytics, SearchConsoleClient};
pub use args::Args;
pub use auth::authenticate;
pub use config::Config;
pub use pipeline::{analyze_site, run_report};
pub use stats::{AnalysisResult, ComparisonEntry, KeywordAggregate, MetricRow};
