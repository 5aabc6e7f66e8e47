//! Export and import command handlers

use std::fs::File;
use std::path::{Path, PathBuf};

use abide_core::Abide;
use abide_core::backup::export_to_dir;
use abide_core::config::Config;
use futures_lite::io::AssertAsync;

use crate::cli::block_on;

/// Handle the export command. Returns true on success.
pub fn handle_export(app: &Abide, config: &Config, destination: Option<PathBuf>) -> bool {
    let dir = destination
        .or_else(|| config.backup_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    match export_to_dir(app.store(), &dir) {
        Ok(path) => {
            println!("✓ Exported to {}", path.display());
            true
        }
        Err(e) => {
            eprintln!("✗ Export failed: {}", e);
            false
        }
    }
}

/// Handle the import command. Returns true on success.
pub fn handle_import(app: &Abide, path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("✗ Could not open {}: {}", path.display(), e);
            return false;
        }
    };

    let mut importer = app.importer();
    match block_on(importer.import_reader(AssertAsync::new(file))) {
        Ok(summary) => {
            println!("✓ Imported {}", path.display());
            for key in &summary.updated_keys {
                println!("  updated {}", key);
            }
            if summary.dropped_records > 0 {
                println!(
                    "  skipped {} record(s) without a usable id or shape",
                    summary.dropped_records
                );
            }
            true
        }
        Err(e) => {
            eprintln!("✗ Import failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abide_core::keys::{GRACE_POINTS, PRAYER_ITEMS};
    use abide_core::model::PrayerItem;

    #[test]
    fn test_export_then_import_into_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = Abide::in_memory();
        source.store().write(GRACE_POINTS, &7).unwrap();
        source
            .prayers()
            .save(PrayerItem {
                id: "p1".into(),
                title: "Peace".into(),
                ..Default::default()
            })
            .unwrap();

        let config = Config::new(dir.path().join("data"));
        assert!(handle_export(&source, &config, Some(dir.path().join("out"))));

        let exported = std::fs::read_dir(dir.path().join("out"))
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        assert!(
            exported
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("Abide-backup-")
        );

        let target = Abide::in_memory();
        assert!(handle_import(&target, &exported));
        assert_eq!(target.store().read(GRACE_POINTS, 0), 7);
        assert_eq!(target.store().read(PRAYER_ITEMS, Vec::new())[0].title, "Peace");
    }

    #[test]
    fn test_import_invalid_json_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let app = Abide::in_memory();
        app.store().write(GRACE_POINTS, &2).unwrap();

        assert!(!handle_import(&app, &path));
        assert_eq!(app.store().read(GRACE_POINTS, 0), 2);
    }

    #[test]
    fn test_import_missing_file_fails() {
        let app = Abide::in_memory();
        assert!(!handle_import(&app, Path::new("/no/such/backup.json")));
    }
}
