use std::sync::Arc;

use clap::Args;
use followup_core::{Config, Database, ScanReport, ScanRunner, SystemClock};

#[derive(Args)]
pub struct ScanArgs {
    /// Plan events but do not write them to the calendar
    #[arg(long)]
    pub dry_run: bool,
    /// Print the report as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}

/// Run one scan with configured collaborators and persist its report.
pub fn scan_once(config: &Config, dry_run: bool) -> Result<ScanReport, Box<dyn std::error::Error>> {
    let runner = ScanRunner::from_config(config, Database::open()?, Arc::new(SystemClock), dry_run)?;
    let report = runner.run()?;
    if let Some(dir) = &config.scan.report_dir {
        let path = report.write_to(dir)?;
        tracing::info!(path = %path.display(), "summary written");
    }
    Ok(report)
}

pub fn run(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let report = scan_once(&config, args.dry_run)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_markdown());
    }
    Ok(())
}
