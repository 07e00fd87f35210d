use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::io;

use rankdelta::{authenticate, run_report, utils, Args, Config};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    let config = Config::from_env()?.with_args(&args);

    let site = utils::prompt_site(&mut io::stdin().lock(), &mut io::stdout())?;
    if site.is_empty() {
        println!("Nenhuma URL informada. Encerrando.");
        return Ok(());
    }

    let client = authenticate(&config)?;

    run_report(&client, &site, &config, Local::now().naive_local())?;
    Ok(())
}
