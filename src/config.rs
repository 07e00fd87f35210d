use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::args::Args;

pub const SEARCH_CONSOLE_SCOPE: &str = "https://www.googleapis.com/auth/webmasters.readonly";
pub const SEARCH_CONSOLE_API_BASE: &str = "https://searchconsole.googleapis.com/webmasters/v3";

/// Hard ceiling the Search Analytics API applies to a single query.
pub const ROW_LIMIT: u32 = 25_000;

/// Length of each comparison window; the report headers name it.
pub const WINDOW_DAYS: i64 = 30;

/// Rows kept in the "top" sheets.
pub const TOP_COUNT: usize = 10;

pub const REPORT_PREFIX: &str = "urls_indexadas_relatorio_";

const DEFAULT_CREDENTIALS_FILE: &str = "service_account.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Service account key (`--credentials` / RANKDELTA_CREDENTIALS)
    pub credentials_path: PathBuf,
    /// Where reports are numbered and written (`--output-dir` / RANKDELTA_OUTPUT_DIR)
    pub output_dir: PathBuf,
    /// Search Console API root (RANKDELTA_API_BASE)
    pub api_base: String,
    pub index_queries: bool,
}

impl Config {
    /// Loads `.env` if present and fills in defaults.
    ///
    /// Credentials and output directory come from [`Args`], which clap also
    /// fills from the environment; see [`Config::with_args`].
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            output_dir: env::current_dir().context("Failed to resolve current directory")?,
            api_base: env::var("RANKDELTA_API_BASE")
                .unwrap_or_else(|_| SEARCH_CONSOLE_API_BASE.to_string()),
            index_queries: false,
        })
    }

    /// Command line flags (or their environment variables) take precedence.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(path) = &args.credentials {
            self.credentials_path = path.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        self.index_queries = args.index_queries;
        self
    }
}
