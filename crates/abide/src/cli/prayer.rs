//! Prayer list command handlers

use abide_core::Abide;
use abide_core::model::{PrayerFilter, PrayerItem, new_id};

use crate::cli::args::{PrayerCommands, PrayerStatusArg};
use crate::cli::comment::handle_comment_command;
use crate::cli::util::{
    delete_records, parse_date_arg, print_comments, print_field, report_unreadable, resolve_id,
    short_id, sort_order,
};

/// Handle the prayer command. Returns true on success.
pub fn handle_prayer_command(app: &Abide, command: PrayerCommands) -> bool {
    let mut prayers = app.prayers();

    match command {
        PrayerCommands::List { list, status } => {
            prayers.set_filter(status.map(status_filter).unwrap_or_default());
            prayers.set_search(list.search.unwrap_or_default());
            prayers.set_sort(sort_order(list.asc));

            let view = prayers.view();
            report_unreadable(&prayers);
            if view.is_empty() {
                println!("No prayer requests.");
            }
            for item in &view {
                println!("{}", summary_line(item));
            }
            true
        }

        PrayerCommands::Show { id } => {
            let Some(id) = resolve_id(&prayers.records(), &id) else {
                return false;
            };
            let Some(item) = prayers.get(&id) else {
                return false;
            };
            println!("{}", item.title);
            println!("id: {}", item.id);
            println!("date: {}", item.prayer_date);
            print_field("for", &item.person);
            print_field("request", &item.content);
            match &item.answered_date {
                Some(date) if item.answered => println!("answered: {}", date),
                _ if item.answered => println!("answered: yes"),
                _ => println!("answered: no"),
            }
            if let Some(response) = &item.gods_response {
                print_field("response", response);
            }
            println!("likes: {}{}", item.likes, if item.liked { " (liked)" } else { "" });
            print_comments(&item.comments);
            true
        }

        PrayerCommands::Add {
            title,
            person,
            content,
            date,
        } => {
            let Some(prayer_date) = parse_date_arg(&date) else {
                return false;
            };
            let item = PrayerItem {
                id: new_id(),
                title,
                person,
                content,
                prayer_date,
                ..Default::default()
            };
            let id = item.id.clone();
            match prayers.save(item) {
                Ok(()) => {
                    println!("✓ Added prayer request ({})", short_id(&id));
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error saving prayer: {}", e);
                    false
                }
            }
        }

        PrayerCommands::Edit {
            id,
            title,
            person,
            content,
            date,
            response,
        } => {
            let Some(id) = resolve_id(&prayers.records(), &id) else {
                return false;
            };
            let date = match date {
                Some(date) => match parse_date_arg(&date) {
                    Some(date) => Some(date),
                    None => return false,
                },
                None => None,
            };
            let result = prayers.update_record(&id, |item| {
                if let Some(title) = title {
                    item.title = title;
                }
                if let Some(person) = person {
                    item.person = person;
                }
                if let Some(content) = content {
                    item.content = content;
                }
                if let Some(date) = date {
                    item.prayer_date = date;
                }
                if let Some(response) = response {
                    item.gods_response = Some(response);
                }
            });
            report(result, "Updated")
        }

        PrayerCommands::Answer { id, response } => {
            let Some(id) = resolve_id(&prayers.records(), &id) else {
                return false;
            };
            let result = prayers.update_record(&id, |item| {
                item.set_answered(true);
                if let Some(response) = response {
                    item.gods_response = Some(response);
                }
            });
            report(result, "Answered")
        }

        PrayerCommands::Unanswer { id } => {
            let Some(id) = resolve_id(&prayers.records(), &id) else {
                return false;
            };
            let result = prayers.update_record(&id, |item| item.set_answered(false));
            report(result, "Reopened")
        }

        PrayerCommands::Delete(args) => {
            delete_records(&mut prayers, &args.ids, args.yes, summary_line)
        }

        PrayerCommands::Like { id } => {
            let Some(id) = resolve_id(&prayers.records(), &id) else {
                return false;
            };
            match prayers.toggle_like(&id) {
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

        PrayerCommands::Comment { command } => handle_comment_command(&mut prayers, command),
    }
}

fn status_filter(status: PrayerStatusArg) -> PrayerFilter {
    match status {
        PrayerStatusArg::All => PrayerFilter::All,
        PrayerStatusArg::Unanswered => PrayerFilter::Unanswered,
        PrayerStatusArg::Answered => PrayerFilter::Answered,
        PrayerStatusArg::Commented => PrayerFilter::Commented,
        PrayerStatusArg::Liked => PrayerFilter::Liked,
    }
}

fn summary_line(item: &PrayerItem) -> String {
    format!(
        "{}  {}  {}{}{}  ♥{}  💬{}",
        short_id(&item.id),
        item.prayer_date,
        if item.answered { "✓ " } else { "" },
        item.title,
        if item.person.is_empty() {
            String::new()
        } else {
            format!(" (for {})", item.person)
        },
        item.likes,
        item.comments.len()
    )
}

fn report(result: abide_core::Result<PrayerItem>, verb: &str) -> bool {
    match result {
        Ok(item) => {
            println!("✓ {} {} ({})", verb, item.title, short_id(&item.id));
            true
        }
        Err(e) => {
            eprintln!("✗ Error saving prayer: {}", e);
            false
        }
    }
}
