use clap::Args;
use followup_core::Database;

#[derive(Args)]
pub struct StatsArgs {
    /// Number of recent runs to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let summary = db.run_summary()?;
    let runs = db.recent_runs(args.limit)?;

    if args.json {
        let out = serde_json::json!({ "summary": summary, "runs": runs });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} runs, average {:.1}s, {:.0}% successful",
        summary.total_runs,
        summary.average_duration_secs,
        summary.success_rate * 100.0
    );
    for run in runs {
        println!(
            "{}  {:>7}  docs={} items={} created={} failed={} ({:.1}s)",
            run.started_at.format("%Y-%m-%d %H:%M"),
            run.status.as_str(),
            run.documents,
            run.action_items,
            run.events_created,
            run.events_failed,
            run.duration_secs
        );
    }
    Ok(())
}
