mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "engage",
    version,
    about = "A desktop companion window with a floating edge widget"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the main window (the widget appears when it is minimized)
    Run {
        /// Show the widget immediately as well
        #[arg(long)]
        show_widget: bool,
    },
    /// Create the default configuration file
    Init,
    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration (file merged over defaults)
    Show,
    /// Print the commented default configuration
    Default,
    /// Validate a configuration file
    Check {
        /// Path to the file to check
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { show_widget } => commands::run::execute(show_widget),
        Commands::Init => commands::init::execute(),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Default => commands::config::default(),
            ConfigCommands::Check { path } => commands::config::check(&path),
        },
    }
}
