//! Message note command handlers

use abide_core::Abide;
use abide_core::model::{MessageNote, NoteFilter, all_tags, new_id, parse_tags};

use crate::cli::args::NoteCommands;
use crate::cli::util::{
    delete_records, parse_date_arg, print_field, report_unreadable, resolve_id, short_id,
    sort_order,
};

/// Handle the notes command. Returns true on success.
pub fn handle_notes_command(app: &Abide, command: NoteCommands) -> bool {
    let mut notes = app.notes();

    match command {
        NoteCommands::List { list, tag } => {
            notes.set_filter(NoteFilter { tag });
            notes.set_search(list.search.unwrap_or_default());
            notes.set_sort(sort_order(list.asc));

            let view = notes.view();
            report_unreadable(&notes);
            if view.is_empty() {
                println!("No message notes.");
            }
            for note in &view {
                println!("{}", summary_line(note));
            }
            true
        }

        NoteCommands::Show { id } => {
            let Some(id) = resolve_id(&notes.records(), &id) else {
                return false;
            };
            let Some(note) = notes.get(&id) else {
                return false;
            };
            println!("{}", note.title);
            println!("id: {}", note.id);
            println!("date: {}", note.date);
            print_field("speaker", &note.speaker);
            print_field("tags", &note.tags.join(", "));
            if !note.content.is_empty() {
                println!();
                println!("{}", note.content);
            }
            true
        }

        NoteCommands::Add {
            title,
            speaker,
            content,
            tags,
            date,
        } => {
            let Some(date) = parse_date_arg(&date) else {
                return false;
            };
            let note = MessageNote {
                id: new_id(),
                date,
                title,
                speaker,
                content,
                tags: parse_tags(&tags),
            };
            let id = note.id.clone();
            match notes.save(note) {
                Ok(()) => {
                    println!("✓ Added note ({})", short_id(&id));
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error saving note: {}", e);
                    false
                }
            }
        }

        NoteCommands::Edit {
            id,
            title,
            speaker,
            content,
            tags,
            date,
        } => {
            let Some(id) = resolve_id(&notes.records(), &id) else {
                return false;
            };
            let date = match date {
                Some(date) => match parse_date_arg(&date) {
                    Some(date) => Some(date),
                    None => return false,
                },
                None => None,
            };
            let result = notes.update_record(&id, |note| {
                if let Some(title) = title {
                    note.title = title;
                }
                if let Some(speaker) = speaker {
                    note.speaker = speaker;
                }
                if let Some(content) = content {
                    note.content = content;
                }
                if let Some(tags) = tags {
                    note.tags = parse_tags(&tags);
                }
                if let Some(date) = date {
                    note.date = date;
                }
            });
            match result {
                Ok(note) => {
                    println!("✓ Updated {} ({})", note.title, short_id(&note.id));
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error saving note: {}", e);
                    false
                }
            }
        }

        NoteCommands::Delete(args) => delete_records(&mut notes, &args.ids, args.yes, summary_line),

        NoteCommands::Tags => {
            for tag in all_tags(&notes.records()) {
                println!("{}", tag);
            }
            true
        }
    }
}

fn summary_line(note: &MessageNote) -> String {
    let tags = if note.tags.is_empty() {
        String::new()
    } else {
        format!("  #{}", note.tags.join(" #"))
    };
    format!(
        "{}  {}  {}{}{}",
        short_id(&note.id),
        note.date,
        note.title,
        if note.speaker.is_empty() {
            String::new()
        } else {
            format!(" ({})", note.speaker)
        },
        tags
    )
}
