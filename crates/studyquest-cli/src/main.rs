use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "studyquest", version, about = "StudyQuest CLI")]
struct Cli {
    /// Act as this user instead of the configured active user
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User accounts
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Report task completions
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Study timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Study sessions tracked outside the timer
    Study {
        #[command(subcommand)]
        action: commands::study::StudyAction,
    },
    /// Day streak reported by the host
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Run periodic housekeeping (combo expiry, daily and weekly resets)
    Tick,
    /// Show gamification state as JSON
    Status {
        #[arg(value_enum, default_value_t = commands::status::StatusView::Profile)]
        view: commands::status::StatusView,
    },
    /// Select an unlocked cosmetic
    Select {
        #[arg(value_enum)]
        kind: commands::select::SelectKind,
        /// Item name
        name: String,
    },
    /// Points leaderboard across local users
    Leaderboard,
    /// Weekly summary
    Report,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("STUDYQUEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let user = cli.user;
    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Task { action } => commands::task::run(action, user),
        Commands::Timer { action } => commands::timer::run(action, user),
        Commands::Study { action } => commands::study::run(action, user),
        Commands::Streak { action } => commands::streak::run(action, user),
        Commands::Tick => commands::tick::run(user),
        Commands::Status { view } => commands::status::run(view, user),
        Commands::Select { kind, name } => commands::select::run(kind, &name, user),
        Commands::Leaderboard => commands::leaderboard::run(user),
        Commands::Report => commands::report::run(user),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
