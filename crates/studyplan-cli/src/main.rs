use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Studyplan calendar CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a week (or two-day slice) of events
    Week(commands::week::WeekArgs),
    /// Show a month grid with the events of each day
    Month(commands::month::MonthArgs),
    /// Find the window and anchor that bring an event into view
    Locate(commands::locate::LocateArgs),
    /// Fetch raw data from the backend
    Fetch {
        #[command(subcommand)]
        action: commands::fetch::FetchAction,
    },
    /// Ask the backend to schedule study sessions for an assignment
    Generate(commands::generate::GenerateArgs),
    /// Pomodoro work/break timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Week(args) => commands::week::run(args),
        Commands::Month(args) => commands::month::run(args),
        Commands::Locate(args) => commands::locate::run(args),
        Commands::Fetch { action } => commands::fetch::run(action),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
