//! Config command handlers

use abide_core::config::Config;
use abide_core::storage::DirectoryStorage;
use std::path::PathBuf;

/// Write a config file and create the data directory.
pub fn handle_init(data_dir: Option<PathBuf>, backup_dir: Option<PathBuf>, no_sync: bool) -> bool {
    let mut config = match data_dir {
        Some(dir) => Config::new(dir),
        None => Config::default(),
    };
    config.backup_dir = backup_dir;
    config.sync_across_contexts = !no_sync;

    if let Err(e) = config.save() {
        eprintln!("✗ Error initializing config: {}", e);
        return false;
    }
    println!("✓ Initialized abide configuration");
    println!("  Data directory: {}", config.data_dir.display());
    if let Some(ref dir) = config.backup_dir {
        println!("  Backup directory: {}", dir.display());
    }
    if let Some(config_path) = Config::config_path() {
        println!("  Config file: {}", config_path.display());
    }

    match DirectoryStorage::open(&config.data_dir) {
        Ok(_) => true,
        Err(e) => {
            eprintln!("✗ Error creating data directory: {}", e);
            false
        }
    }
}

/// Show the effective configuration.
pub fn show_config(config: &Config) {
    println!("Abide Configuration");
    println!("===================");
    println!("Data directory: {}", config.data_dir.display());
    println!("Sync across processes: {}", config.sync_across_contexts);
    if let Some(ref dir) = config.backup_dir {
        println!("Backup directory: {}", dir.display());
    }
    match config.card_pool {
        Some(ref path) => println!("Card pool: {}", path.display()),
        None => println!("Card pool: built-in"),
    }
    match Config::config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not created; run 'abide init')", path.display()),
        None => {}
    }
}
