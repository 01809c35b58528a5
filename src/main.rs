use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cleopattes::cli::{
    handle_animals_command, handle_backup_command, handle_clients_command,
    handle_dashboard_command, handle_export_command, handle_planning_command,
    handle_search_command, handle_services_command, AnimalArgs, ClientArgs, DashboardArgs,
    ExportArgs, PlanningArgs, SearchArgs, ServiceArgs,
};
use cleopattes::config::{CleoPaths, Settings};
use cleopattes::logging::init_logging;
use cleopattes::storage::{AppRepository, MockAppRepository, SeedConfig};

#[derive(Parser)]
#[command(
    name = "cleopattes",
    version,
    about = "Pet-sitting business manager",
    long_about = "CleoPattes keeps track of a pet-sitter's clients and their animals, \
                  the services on offer, booked prestations and the planning calendar."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Start with an empty store instead of the sample data
    #[arg(long, global = true)]
    no_sample_data: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List clients
    Clients(ClientArgs),

    /// List animals
    Animals(AnimalArgs),

    /// List the service catalogue
    Services(ServiceArgs),

    /// Show the time slots of a day, week or month
    Planning(PlanningArgs),

    /// Show statistics for a reporting window
    Dashboard(DashboardArgs),

    /// Search clients, animals, services and prestations
    Search(SearchArgs),

    /// Export data to a file
    Export(ExportArgs),

    /// Write a JSON backup into the backup directory
    Backup,

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = CleoPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let seed = if cli.no_sample_data {
        SeedConfig::empty()
    } else {
        SeedConfig::sample()
    };
    let repository: Arc<dyn AppRepository> = Arc::new(MockAppRepository::new(&seed)?);
    tracing::debug!(sample_data = seed.sample_data, base_dir = %paths.base_dir().display(), "repository ready");

    match cli.command {
        Some(Commands::Clients(args)) => handle_clients_command(repository, args).await?,
        Some(Commands::Animals(args)) => handle_animals_command(repository, args).await?,
        Some(Commands::Services(args)) => {
            handle_services_command(repository, &settings, args).await?
        }
        Some(Commands::Planning(args)) => handle_planning_command(repository, args).await?,
        Some(Commands::Dashboard(args)) => {
            handle_dashboard_command(repository, &settings, args).await?
        }
        Some(Commands::Search(args)) => handle_search_command(repository, args).await?,
        Some(Commands::Export(args)) => handle_export_command(repository, paths, args).await?,
        Some(Commands::Backup) => handle_backup_command(repository, paths).await?,
        Some(Commands::Config) => {
            println!("CleoPattes Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Language:         {}", settings.language);
            println!("  Currency:         {} ({})", settings.currency, settings.currency_symbol());
            println!("  Date format:      {}", settings.date_format);
            println!("  Time format:      {}", settings.time_format);
            println!("  Notifications:    {}", settings.notifications_enabled);
            println!("  Auto backup:      {}", settings.auto_backup_enabled);
            println!("  Backup frequency: {}", settings.backup_frequency);
        }
        None => {
            println!("CleoPattes - Pet-sitting business manager");
            println!();
            println!("Run 'cleopattes --help' for usage information.");
        }
    }

    Ok(())
}
