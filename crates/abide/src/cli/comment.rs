//! Comment subcommands shared by the journal and prayer list

use abide_core::collection::{CollectionController, DerivedState};
use abide_core::model::{Commentable, Record};

use crate::cli::args::CommentCommands;
use crate::cli::util::{resolve_id, short_id};

/// Handle a comment subcommand against any commentable collection.
pub fn handle_comment_command<T, H>(
    controller: &mut CollectionController<T, H>,
    command: CommentCommands,
) -> bool
where
    T: Record + Commentable,
    H: DerivedState<T>,
{
    let records = controller.records();
    match command {
        CommentCommands::Add { id, text } => {
            let Some(id) = resolve_id(&records, &id) else {
                return false;
            };
            match controller.add_comment(&id, &text) {
                Ok(comment) => {
                    println!("✓ Added comment {}", short_id(&comment.id));
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error adding comment: {}", e);
                    false
                }
            }
        }
        CommentCommands::Edit {
            id,
            comment_id,
            text,
        } => {
            let Some(id) = resolve_id(&records, &id) else {
                return false;
            };
            let Some(comment_id) = resolve_comment(&records, &id, &comment_id) else {
                return false;
            };
            match controller.update_comment(&id, &comment_id, &text) {
                Ok(()) => {
                    println!("✓ Updated comment {}", short_id(&comment_id));
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error updating comment: {}", e);
                    false
                }
            }
        }
        CommentCommands::Delete { id, comment_id } => {
            let Some(id) = resolve_id(&records, &id) else {
                return false;
            };
            let Some(comment_id) = resolve_comment(&records, &id, &comment_id) else {
                return false;
            };
            match controller.delete_comment(&id, &comment_id) {
                Ok(()) => {
                    println!("✓ Deleted comment {}", short_id(&comment_id));
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error deleting comment: {}", e);
                    false
                }
            }
        }
    }
}

fn resolve_comment<T: Record + Commentable>(
    records: &[T],
    record_id: &str,
    input: &str,
) -> Option<String> {
    let record = records.iter().find(|r| r.id() == record_id)?;
    let matches: Vec<&str> = record
        .comments()
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| *id == input || id.starts_with(input))
        .collect();

    if let Some(exact) = matches.iter().find(|id| **id == input) {
        return Some(exact.to_string());
    }
    match matches.as_slice() {
        [only] => Some(only.to_string()),
        [] => {
            eprintln!("✗ No comment with id {}", input);
            None
        }
        _ => {
            eprintln!("✗ Comment id prefix {} is ambiguous", input);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abide_core::Abide;
    use abide_core::model::PrayerItem;

    #[test]
    fn test_add_edit_delete_comment_by_prefix() {
        let app = Abide::in_memory();
        let mut prayers = app.prayers();
        prayers
            .save(PrayerItem {
                id: "prayer-1".into(),
                ..Default::default()
            })
            .unwrap();

        assert!(handle_comment_command(
            &mut prayers,
            CommentCommands::Add {
                id: "prayer".into(),
                text: "Still waiting".into(),
            },
        ));
        let comment_id = prayers.get("prayer-1").unwrap().comments[0].id.clone();

        assert!(handle_comment_command(
            &mut prayers,
            CommentCommands::Edit {
                id: "prayer-1".into(),
                comment_id: comment_id[..6].to_string(),
                text: "Answered!".into(),
            },
        ));
        assert_eq!(prayers.get("prayer-1").unwrap().comments[0].text, "Answered!");

        assert!(handle_comment_command(
            &mut prayers,
            CommentCommands::Delete {
                id: "prayer-1".into(),
                comment_id,
            },
        ));
        assert!(prayers.get("prayer-1").unwrap().comments.is_empty());
    }

    #[test]
    fn test_blank_comment_fails() {
        let app = Abide::in_memory();
        let mut prayers = app.prayers();
        prayers
            .save(PrayerItem {
                id: "p".into(),
                ..Default::default()
            })
            .unwrap();

        assert!(!handle_comment_command(
            &mut prayers,
            CommentCommands::Add {
                id: "p".into(),
                text: "   ".into(),
            },
        ));
    }
}
