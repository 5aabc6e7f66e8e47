//! Tracker and reading-plan command handlers

use abide_core::Abide;
use abide_core::model::PlanProgress;
use abide_core::tracker::TOTAL_BIBLE_CHAPTERS;

use crate::cli::args::{PlanCommands, TrackerCommands};

/// Handle the tracker command. Returns true on success.
pub fn handle_tracker_command(app: &Abide, command: TrackerCommands) -> bool {
    let tracker = app.tracker();

    match command {
        TrackerCommands::Show { book } => {
            let progress = tracker.progress();
            let books: Vec<&str> = match &book {
                Some(book) => vec![book.as_str()],
                None => progress.books().collect(),
            };
            for book in books {
                println!("{}: {}", book, format_chapters(&progress.read_chapters(book)));
            }

            let summary = tracker.summary(TOTAL_BIBLE_CHAPTERS);
            println!(
                "{} of {} chapters read ({:.1}%)",
                summary.completed_chapters, summary.total_chapters, summary.percentage
            );
            true
        }

        TrackerCommands::Toggle { book, chapter } => match tracker.toggle_chapter(&book, chapter) {
            Ok(read) => {
                let state = if read { "read" } else { "unread" };
                println!("✓ {} {} marked {}", book, chapter, state);
                true
            }
            Err(e) => {
                eprintln!("✗ Error updating tracker: {}", e);
                false
            }
        },
    }
}

/// Handle the plan command. Returns true on success.
pub fn handle_plan_command(app: &Abide, command: PlanCommands) -> bool {
    let plans = app.plans();

    match command {
        PlanCommands::Show { plan } => {
            let progress = plans.progress();
            let ids: Vec<&str> = match &plan {
                Some(plan) => vec![plan.as_str()],
                None => progress.plans().collect(),
            };
            if ids.is_empty() {
                println!("No plan progress yet.");
            }
            for id in ids {
                println!(
                    "{}: {} day(s) done [{}]",
                    id,
                    progress.completed_days(id),
                    format_chapters(&done_days(&progress, id))
                );
            }
            true
        }

        PlanCommands::Toggle { plan, day } => match plans.toggle_day(&plan, day) {
            Ok(done) => {
                let state = if done { "done" } else { "not done" };
                println!("✓ {} day {} marked {}", plan, day, state);
                true
            }
            Err(e) => {
                eprintln!("✗ Error updating plan: {}", e);
                false
            }
        },

        PlanCommands::Complete { plan, day } => match plans.complete_day(&plan, day) {
            Ok(()) => {
                println!(
                    "✓ {} day {} done ({} day(s) total)",
                    plan,
                    day,
                    plans.completed_days(&plan)
                );
                true
            }
            Err(e) => {
                eprintln!("✗ Error updating plan: {}", e);
                false
            }
        },
    }
}

fn done_days(progress: &PlanProgress, plan_id: &str) -> Vec<u32> {
    progress
        .0
        .get(plan_id)
        .map(|days| {
            days.iter()
                .filter(|(_, done)| **done)
                .map(|(day, _)| *day)
                .collect()
        })
        .unwrap_or_default()
}

/// Collapse sorted numbers into ranges: `1-3, 5, 7-8`.
fn format_chapters(numbers: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut iter = numbers.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(&next) = iter.peek() {
            if next != end + 1 {
                break;
            }
            end = next;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_chapters() {
        assert_eq!(format_chapters(&[1, 2, 3, 5, 7, 8]), "1-3, 5, 7-8");
        assert_eq!(format_chapters(&[4]), "4");
        assert_eq!(format_chapters(&[]), "-");
    }

    #[test]
    fn test_tracker_toggle_twice_restores() {
        let app = Abide::in_memory();
        let toggle = || TrackerCommands::Toggle {
            book: "Psalms".into(),
            chapter: 23,
        };

        assert!(handle_tracker_command(&app, toggle()));
        assert!(app.tracker().progress().is_read("Psalms", 23));
        assert!(handle_tracker_command(&app, toggle()));
        assert!(app.tracker().progress().is_empty());
    }

    #[test]
    fn test_plan_complete_then_toggle_off_keeps_plan() {
        let app = Abide::in_memory();
        assert!(handle_plan_command(
            &app,
            PlanCommands::Complete {
                plan: "gospels".into(),
                day: 2,
            },
        ));
        assert!(handle_plan_command(
            &app,
            PlanCommands::Toggle {
                plan: "gospels".into(),
                day: 2,
            },
        ));

        let progress = app.plans().progress();
        assert_eq!(progress.completed_days("gospels"), 0);
        assert_eq!(progress.plans().collect::<Vec<_>>(), vec!["gospels"]);
        assert!(done_days(&progress, "gospels").is_empty());
    }
}
