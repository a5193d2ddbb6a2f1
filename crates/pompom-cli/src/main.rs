use clap::{CommandFactory, Parser, Subcommand};
use indoc::indoc;
use pompom_core::storage::AppConfig;
use tracing::warn;

mod commands;
mod input;
mod logging;
mod ui;
mod view;

const AFTER_HELP: &str = indoc! {"
    KEY BINDINGS:
        Space   Start/pause timer
        r       Reset current timer
        d       Reset current mode to its default duration
        1/2/3   Switch to FOCUS / SHORT BREAK / LONG BREAK
        +/-     Increase/decrease current duration
        a       Toggle auto-switch
        c       Clear statistics
        ?       Show help
        q       Quit

    FILES:
        ~/.pompom/settings.json   durations, auto-switch, completed sessions
        ~/.pompom/config.toml     sound and logging preferences
        ~/.pompom/sound.wav       completion sound
"};

#[derive(Parser)]
#[command(name = "pompom", version, about = "PomPom - Pomodoro timer for the terminal")]
#[command(after_help = AFTER_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive timer (default)
    Run(commands::run::RunArgs),
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Focus session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(commands::run::RunArgs::default()));

    let loaded = AppConfig::path().and_then(|p| AppConfig::load_from(&p));
    let (app_config, config_error) = match loaded {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let target = match command {
        Commands::Run(_) => logging::LogTarget::File,
        _ => logging::LogTarget::Stderr,
    };
    logging::init(target, &app_config.logging.level);
    if let Some(e) = config_error {
        warn!(error = %e, "using default app config");
    }

    let result = match command {
        Commands::Run(args) => commands::run::run(args, &app_config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
