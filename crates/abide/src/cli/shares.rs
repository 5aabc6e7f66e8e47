//! Small-group share command handlers

use abide_core::Abide;
use abide_core::model::{SmallGroupShare, new_id};

use crate::cli::args::ShareCommands;
use crate::cli::util::{
    delete_records, parse_date_arg, report_unreadable, resolve_id, short_id, sort_order,
};

/// Handle the shares command. Returns true on success.
pub fn handle_shares_command(app: &Abide, command: ShareCommands) -> bool {
    let mut shares = app.shares();

    match command {
        ShareCommands::List { list } => {
            shares.set_search(list.search.unwrap_or_default());
            shares.set_sort(sort_order(list.asc));

            let view = shares.view();
            report_unreadable(&shares);
            if view.is_empty() {
                println!("No small-group shares.");
            }
            for share in &view {
                println!("{}", summary_line(share));
                if !share.my_share.is_empty() {
                    println!("    {}", share.my_share);
                }
            }
            true
        }

        ShareCommands::Add {
            group,
            book,
            chapter,
            verse,
            topic,
            share,
            date,
        } => {
            let Some(date) = parse_date_arg(&date) else {
                return false;
            };
            let record = SmallGroupShare {
                id: new_id(),
                date,
                group_name: group,
                book,
                chapter,
                verse,
                topic,
                my_share: share,
            };
            let id = record.id.clone();
            match shares.save(record) {
                Ok(()) => {
                    println!("✓ Added share ({})", short_id(&id));
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error saving share: {}", e);
                    false
                }
            }
        }

        ShareCommands::Edit {
            id,
            group,
            book,
            chapter,
            verse,
            topic,
            share,
            date,
        } => {
            let Some(id) = resolve_id(&shares.records(), &id) else {
                return false;
            };
            let date = match date {
                Some(date) => match parse_date_arg(&date) {
                    Some(date) => Some(date),
                    None => return false,
                },
                None => None,
            };
            let result = shares.update_record(&id, |record| {
                if let Some(group) = group {
                    record.group_name = group;
                }
                if let Some(book) = book {
                    record.book = book;
                }
                if let Some(chapter) = chapter {
                    record.chapter = chapter;
                }
                if let Some(verse) = verse {
                    record.verse = verse;
                }
                if let Some(topic) = topic {
                    record.topic = topic;
                }
                if let Some(share) = share {
                    record.my_share = share;
                }
                if let Some(date) = date {
                    record.date = date;
                }
            });
            match result {
                Ok(record) => {
                    println!("✓ Updated share ({})", short_id(&record.id));
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error saving share: {}", e);
                    false
                }
            }
        }

        ShareCommands::Delete(args) => {
            delete_records(&mut shares, &args.ids, args.yes, summary_line)
        }
    }
}

fn summary_line(share: &SmallGroupShare) -> String {
    let reference = if share.verse.is_empty() {
        format!("{} {}", share.book, share.chapter)
    } else {
        format!("{} {}:{}", share.book, share.chapter, share.verse)
    };
    format!(
        "{}  {}  [{}] {}{}",
        short_id(&share.id),
        share.date,
        share.group_name,
        reference,
        if share.topic.is_empty() {
            String::new()
        } else {
            format!(" - {}", share.topic)
        }
    )
}
