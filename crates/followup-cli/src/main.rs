use clap::{Parser, Subcommand};
use followup_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "followup-cli", version, about = "Turn document action items into calendar follow-ups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan changed documents once and schedule their action items
    Scan(commands::scan::ScanArgs),
    /// Scan repeatedly until interrupted
    Watch(commands::watch::WatchArgs),
    /// Plan a follow-up for a single action item without writing it anywhere
    Plan(commands::plan::PlanArgs),
    /// Scan run history
    Stats(commands::stats::StatsArgs),
    /// List Google Drive folders available for `source.folder_id`
    Folders(commands::folders::FoldersArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Credential management for the analyzer and Google APIs
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Scan(args) => commands::scan::run(args),
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Folders(args) => commands::folders::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
