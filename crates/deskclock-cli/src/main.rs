use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "deskclock-cli", version, about = "Deskclock CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Countdown timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Timer history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Drag physics tools
    Drag {
        #[command(subcommand)]
        action: commands::drag::DragAction,
    },
    /// Print the current wall clock
    Clock(commands::clock::ClockArgs),
}

fn init_tracing() {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DESKCLOCK_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Drag { action } => commands::drag::run(action),
        Commands::Clock(args) => commands::clock::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
