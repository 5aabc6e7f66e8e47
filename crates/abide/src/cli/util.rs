//! Shared utilities for CLI commands

use std::io::{self, Write};
use std::path::PathBuf;

use abide_core::Abide;
use abide_core::collection::{CollectionController, DerivedState, SortOrder};
use abide_core::config::Config;
use abide_core::date::normalize_date;
use abide_core::model::{Comment, Record};

/// Load the config file, applying a `--data-dir` override.
pub fn load_config(data_dir: Option<PathBuf>) -> Config {
    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("Could not read config file, using defaults: {}", e);
        Config::default()
    });
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    config
}

/// Open the data directory named by `config`, printing the failure.
pub fn open_app(config: &Config) -> Option<Abide> {
    match Abide::from_config(config) {
        Ok(app) => Some(app),
        Err(e) => {
            eprintln!(
                "✗ Could not open data directory {}: {}",
                config.data_dir.display(),
                e
            );
            None
        }
    }
}

/// Ask a yes/no question on stdin. Anything but "y"/"yes" is a no.
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

/// Parse a date argument, printing the failure.
pub fn parse_date_arg(input: &str) -> Option<String> {
    match normalize_date(input) {
        Ok(date) => Some(date),
        Err(e) => {
            eprintln!("✗ {}", e);
            None
        }
    }
}

/// Map the `--asc` flag to a sort order.
pub fn sort_order(asc: bool) -> SortOrder {
    if asc { SortOrder::Asc } else { SortOrder::Desc }
}

/// The first eight characters of an id.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Resolve a full id or a unique id prefix against `records`.
pub fn resolve_id<T: Record>(records: &[T], input: &str) -> Option<String> {
    if let Some(exact) = records.iter().find(|r| r.id() == input) {
        return Some(exact.id().to_string());
    }

    let matches: Vec<&str> = records
        .iter()
        .map(|r| r.id())
        .filter(|id| id.starts_with(input))
        .collect();
    match matches.as_slice() {
        [only] => Some(only.to_string()),
        [] => {
            eprintln!("✗ No record with id {}", input);
            None
        }
        _ => {
            eprintln!(
                "✗ Id prefix {} is ambiguous ({} matches)",
                input,
                matches.len()
            );
            None
        }
    }
}

/// Stage `ids` for deletion, confirm unless `yes`, then delete.
///
/// `describe` renders one line per staged record for the prompt.
pub fn delete_records<T, H>(
    controller: &mut CollectionController<T, H>,
    ids: &[String],
    yes: bool,
    describe: impl Fn(&T) -> String,
) -> bool
where
    T: Record,
    H: DerivedState<T>,
{
    let records = controller.records();
    let mut resolved = Vec::with_capacity(ids.len());
    for input in ids {
        match resolve_id(&records, input) {
            Some(id) => resolved.push(id),
            None => return false,
        }
    }

    if !controller.request_delete(resolved) {
        println!("Nothing to delete.");
        return true;
    }

    let staged: Vec<&T> = records
        .iter()
        .filter(|r| controller.pending_delete().contains(r.id()))
        .collect();
    for record in &staged {
        println!("  {}", describe(record));
    }

    if !yes && !confirm(&format!("Delete {} item(s)?", staged.len())) {
        controller.cancel_delete();
        println!("Cancelled.");
        return true;
    }

    match controller.confirm_delete() {
        Ok(count) => {
            println!("✓ Deleted {} item(s)", count);
            true
        }
        Err(e) => {
            eprintln!("✗ Error deleting: {}", e);
            false
        }
    }
}

/// Mention stored records that could not be read, if any.
pub fn report_unreadable<T, H>(controller: &CollectionController<T, H>) -> usize
where
    T: Record,
    H: DerivedState<T>,
{
    let count = controller.unreadable_count();
    if count > 0 {
        eprintln!(
            "⚠ {} stored record(s) could not be read and were left untouched",
            count
        );
    }
    count
}

/// Print a comment thread, indented.
pub fn print_comments(comments: &[Comment]) {
    if comments.is_empty() {
        return;
    }
    println!("Comments:");
    for comment in comments {
        println!(
            "  [{}] {}  {}",
            short_id(&comment.id),
            comment.created_at,
            comment.text
        );
    }
}

/// Print an optional labelled field, skipping blanks.
pub fn print_field(label: &str, value: &str) {
    if !value.trim().is_empty() {
        println!("{}: {}", label, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abide_core::bridge::BindingOptions;
    use abide_core::model::PrayerItem;
    use abide_core::storage::InMemoryStorage;

    fn prayer(id: &str) -> PrayerItem {
        PrayerItem {
            id: id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_resolve_id_prefers_exact_match() {
        let records = vec![prayer("ab"), prayer("abc")];
        assert_eq!(resolve_id(&records, "ab").as_deref(), Some("ab"));
    }

    #[test]
    fn test_resolve_id_unique_prefix() {
        let records = vec![prayer("abc123"), prayer("def456")];
        assert_eq!(resolve_id(&records, "de").as_deref(), Some("def456"));
    }

    #[test]
    fn test_resolve_id_ambiguous_or_missing() {
        let records = vec![prayer("abc1"), prayer("abc2")];
        assert_eq!(resolve_id(&records, "abc"), None);
        assert_eq!(resolve_id(&records, "zzz"), None);
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(sort_order(true), SortOrder::Asc);
        assert_eq!(sort_order(false), SortOrder::Desc);
    }

    #[test]
    fn test_report_unreadable_counts_bad_records() {
        let app = Abide::new(
            InMemoryStorage::new()
                .with_item("prayerItems", r#"[{"id": "ok"}, {"id": "bad", "comments": null}]"#),
            BindingOptions::default(),
        );
        assert_eq!(report_unreadable(&app.prayers()), 1);
        assert_eq!(report_unreadable(&app.journal()), 0);
    }

    #[test]
    fn test_delete_records_with_yes_skips_prompt() {
        let app = Abide::in_memory();
        let mut prayers = app.prayers();
        prayers.save(prayer("keep")).unwrap();
        prayers.save(prayer("drop")).unwrap();

        assert!(delete_records(&mut prayers, &["dr".to_string()], true, |p| p.id.clone()));

        assert_eq!(prayers.len(), 1);
        assert!(prayers.get("keep").is_some());
    }
}
