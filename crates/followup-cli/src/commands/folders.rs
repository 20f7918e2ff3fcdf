use clap::Args;
use followup_core::scan::drive_source;
use followup_core::Config;

#[derive(Args)]
pub struct FoldersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FoldersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let folders = drive_source(&config)?.list_folders()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&folders)?);
        return Ok(());
    }

    if folders.is_empty() {
        println!("No folders found.");
        return Ok(());
    }
    for folder in &folders {
        println!("{:<36}  {}", folder.id, folder.name);
    }
    println!("\nSet one with `config set source.folder_id <id>` or `config set source.folder_name <name>`.");
    Ok(())
}
