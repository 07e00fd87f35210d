use std::io::{self, BufRead, Write};

use time::macros::format_description;
use tracing_subscriber::{fmt::time::LocalTime, EnvFilter};

/// `RUST_LOG` wins when set; otherwise `--verbose` picks between info and error.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Asks for the site property and returns it trimmed; empty means "quit".
pub fn prompt_site<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(
        output,
        "Informe a URL do site (prefixo completo, ex.: https://www.exemplo.com.br/): "
    )?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
