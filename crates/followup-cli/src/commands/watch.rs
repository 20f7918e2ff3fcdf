use std::future::Future;
use std::time::Duration;

use clap::Args;
use followup_core::Config;

use super::scan::scan_once;

#[derive(Args)]
pub struct WatchArgs {
    /// Hours between scans (defaults to `scan.interval_hours`)
    #[arg(long)]
    pub interval_hours: Option<u32>,
    /// Plan events but do not write them to the calendar
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let hours = args.interval_hours.unwrap_or(config.scan.interval_hours).max(1);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(watch(config, hours, args.dry_run));
    Ok(())
}

async fn watch(config: Config, hours: u32, dry_run: bool) {
    tracing::info!(interval_hours = hours, "watching for changed documents");
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    watch_loop(Duration::from_secs(u64::from(hours) * 3600), ctrl_c, || {
        let cfg = config.clone();
        async move {
            let result = tokio::task::spawn_blocking(move || {
                scan_once(&cfg, dry_run).map_err(|e| e.to_string())
            })
            .await;
            match result {
                Ok(Ok(report)) => println!(
                    "{} scan: {} documents, {} events created, {} failed",
                    report.started_at.format("%Y-%m-%d %H:%M"),
                    report.documents.len(),
                    report.events_created(),
                    report.events_failed(),
                ),
                Ok(Err(e)) => tracing::error!(error = %e, "scan failed"),
                Err(e) => tracing::error!(error = %e, "scan task panicked"),
            }
        }
    })
    .await;
}

/// Run `job` once per `period` until `shutdown` resolves.
///
/// `shutdown` is polled both while idle and while a job is running; a job
/// in flight is allowed to finish before the loop exits. Returns the
/// number of jobs started.
async fn watch_loop<S, J, F>(period: Duration, shutdown: S, mut job: J) -> usize
where
    S: Future<Output = ()>,
    J: FnMut() -> F,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    tokio::pin!(shutdown);
    let mut runs = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("interrupted; stopping");
                break;
            }
            _ = ticker.tick() => {}
        }

        runs += 1;
        let current = job();
        tokio::pin!(current);
        tokio::select! {
            biased;
            _ = &mut current => {}
            _ = &mut shutdown => {
                tracing::info!("interrupted; finishing current scan");
                current.await;
                break;
            }
        }
    }
    runs
}
