/// Clap argument definitions
mod args;

/// Export and import
mod backup;

/// Devotional cards
mod cards;

/// Comment subcommands shared by the journal and prayer list
mod comment;

/// Config command handlers
mod config;

/// Journal entries
mod journal;

/// Message notes
mod notes;

/// Prayer requests
mod prayer;

/// Bible tracker and reading plans
mod progress;

/// Small-group shares
mod shares;

/// Shared CLI utilities
mod util;

/// Follow writes from other processes
mod watch;

use clap::Parser;
use std::time::Duration;

use args::Commands;

/// Helper to run async operations in sync context
fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures_lite::future::block_on(f)
}

pub use args::Cli;

pub fn run_cli() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Init writes the config; every other command reads it
    if let Commands::Init { backup_dir, no_sync } = cli.command {
        if !config::handle_init(cli.data_dir, backup_dir, no_sync) {
            std::process::exit(1);
        }
        return;
    }

    let config = util::load_config(cli.data_dir);
    if let Commands::Config = cli.command {
        config::show_config(&config);
        return;
    }

    let Some(app) = util::open_app(&config) else {
        std::process::exit(1);
    };

    // Execute commands and track success
    let success = match cli.command {
        Commands::Journal { command } => journal::handle_journal_command(&app, command),

        Commands::Prayer { command } => prayer::handle_prayer_command(&app, command),

        Commands::Notes { command } => notes::handle_notes_command(&app, command),

        Commands::Shares { command } => shares::handle_shares_command(&app, command),

        Commands::Cards { command } => cards::handle_cards_command(&app, &config, command),

        Commands::Tracker { command } => progress::handle_tracker_command(&app, command),

        Commands::Plan { command } => progress::handle_plan_command(&app, command),

        Commands::Export { destination } => backup::handle_export(&app, &config, destination),

        Commands::Import { path } => backup::handle_import(&app, &path),

        Commands::Watch { interval } => watch::handle_watch(&app, Duration::from_millis(interval)),

        Commands::Init { .. } | Commands::Config => true,
    };

    if !success {
        std::process::exit(1);
    }
}
