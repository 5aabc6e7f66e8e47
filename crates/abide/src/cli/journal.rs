//! Journal command handlers

use abide_core::Abide;
use abide_core::journal::{JournalController, journal_books};
use abide_core::keys::GRACE_POINTS;
use abide_core::model::{JournalEntry, JournalFilter, JournalStatus, new_id};

use crate::cli::args::{JournalCommands, JournalStatusArg};
use crate::cli::comment::handle_comment_command;
use crate::cli::util::{
    delete_records, parse_date_arg, print_comments, print_field, report_unreadable, resolve_id,
    short_id, sort_order,
};

/// Handle the journal command. Returns true on success.
pub fn handle_journal_command(app: &Abide, command: JournalCommands) -> bool {
    let mut journal = app.journal();

    match command {
        JournalCommands::List { list, status, book } => {
            journal.set_filter(JournalFilter {
                status: status.map(status_filter).unwrap_or_default(),
                book,
            });
            journal.set_search(list.search.unwrap_or_default());
            journal.set_sort(sort_order(list.asc));

            let view = journal.view();
            report_unreadable(&journal);
            if view.is_empty() {
                println!("No journal entries.");
            }
            for entry in &view {
                println!("{}", summary_line(entry));
            }
            true
        }

        JournalCommands::Show { id } => {
            let Some(id) = resolve_id(&journal.records(), &id) else {
                return false;
            };
            let Some(entry) = journal.get(&id) else {
                return false;
            };
            println!("{}", entry.title.clone().unwrap_or_else(|| entry.derived_title()));
            println!("id: {}", entry.id);
            println!("date: {}", entry.date);
            println!("completed: {}", entry.completed);
            println!("likes: {}{}", entry.likes, if entry.liked { " (liked)" } else { "" });
            print_field("highlights", &entry.highlights);
            print_field("message", &entry.god_message);
            print_comments(&entry.comments);
            true
        }

        JournalCommands::Add {
            book,
            chapter,
            verse,
            date,
            highlights,
            message,
            completed,
        } => {
            let Some(date) = parse_date_arg(&date) else {
                return false;
            };
            let entry = JournalEntry {
                id: new_id(),
                date,
                book,
                chapter,
                verse: verse.filter(|v| !v.trim().is_empty()),
                highlights: highlights.unwrap_or_default(),
                god_message: message.unwrap_or_default(),
                completed,
                ..Default::default()
            };
            let id = entry.id.clone();
            save_and_report(app, &mut journal, entry, "Added", &id)
        }

        JournalCommands::Edit {
            id,
            book,
            chapter,
            verse,
            date,
            highlights,
            message,
            completed,
        } => {
            let Some(id) = resolve_id(&journal.records(), &id) else {
                return false;
            };
            let Some(mut entry) = journal.get(&id) else {
                return false;
            };
            if let Some(date) = date {
                let Some(date) = parse_date_arg(&date) else {
                    return false;
                };
                entry.date = date;
            }
            if let Some(book) = book {
                entry.book = book;
            }
            if let Some(chapter) = chapter {
                entry.chapter = chapter;
            }
            if let Some(verse) = verse {
                entry.verse = Some(verse).filter(|v| !v.trim().is_empty());
            }
            if let Some(highlights) = highlights {
                entry.highlights = highlights;
            }
            if let Some(message) = message {
                entry.god_message = message;
            }
            if let Some(completed) = completed {
                entry.completed = completed;
            }
            save_and_report(app, &mut journal, entry, "Updated", &id)
        }

        JournalCommands::Delete(args) => {
            delete_records(&mut journal, &args.ids, args.yes, summary_line)
        }

        JournalCommands::Like { id } => {
            let Some(id) = resolve_id(&journal.records(), &id) else {
                return false;
            };
            match journal.toggle_like(&id) {
                Ok(likes) => {
                    println!("✓ {} now has {} like(s)", short_id(&id), likes);
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error: {}", e);
                    false
                }
            }
        }

        JournalCommands::Comment { command } => handle_comment_command(&mut journal, command),

        JournalCommands::Books => {
            for book in journal_books(&journal.records()) {
                println!("{}", book);
            }
            true
        }
    }
}

fn status_filter(status: JournalStatusArg) -> JournalStatus {
    match status {
        JournalStatusArg::All => JournalStatus::All,
        JournalStatusArg::Commented => JournalStatus::Commented,
        JournalStatusArg::Liked => JournalStatus::Liked,
        JournalStatusArg::Pending => JournalStatus::PendingMeditation,
    }
}

fn summary_line(entry: &JournalEntry) -> String {
    let title = entry.title.clone().unwrap_or_else(|| entry.derived_title());
    format!(
        "{}  {}  {}{}  ♥{}  💬{}",
        short_id(&entry.id),
        entry.date,
        if entry.completed { "✓ " } else { "" },
        title,
        entry.likes,
        entry.comments.len()
    )
}

fn save_and_report(
    app: &Abide,
    journal: &mut JournalController,
    entry: JournalEntry,
    verb: &str,
    id: &str,
) -> bool {
    let points_before = app.store().read(GRACE_POINTS, 0);
    if let Err(e) = journal.save(entry) {
        eprintln!("✗ Error saving entry: {}", e);
        return false;
    }

    let title = journal
        .get(id)
        .and_then(|e| e.title)
        .unwrap_or_else(|| id.to_string());
    println!("✓ {} {} ({})", verb, title, short_id(id));

    let points_after = app.store().read(GRACE_POINTS, 0);
    if points_after > points_before {
        println!("  +{} grace point ({} total)", points_after - points_before, points_after);
    }
    true
}
