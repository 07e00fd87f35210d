use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rankdelta",
    about = "Compare the last two 30-day Search Console windows for a site and export a spreadsheet report",
    version,
    long_about = None
)]
pub struct Args {
    /// Path to the service account key file
    #[arg(short, long, env = "RANKDELTA_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Directory the report is written to
    #[arg(short, long, env = "RANKDELTA_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Add a sheet of `site:` queries for checking each URL by hand
    #[arg(long)]
    pub index_queries: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
