use abide_core::backup::{ExportDocument, export_json};
use abide_core::bridge::{Binding, BindingOptions};
use abide_core::cards::DrawError;
use abide_core::keys::{BIBLE_TRACKER_PROGRESS, GRACE_POINTS, PRAYER_ITEMS};
use abide_core::model::{
    CardContent, JesusSaidCard, JournalEntry, MessageNote, PrayerItem, SmallGroupShare,
    TrackerProgress, new_id,
};
use abide_core::storage::{DirectoryStorage, InMemoryStorage};
use abide_core::{Abide, AbideError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn journal_entry(book: &str, chapter: u32, completed: bool) -> JournalEntry {
    JournalEntry {
        id: new_id(),
        date: "2024-04-01".into(),
        book: book.into(),
        chapter,
        completed,
        highlights: "In the beginning".into(),
        ..Default::default()
    }
}

fn card_content(verse: &str) -> CardContent {
    CardContent {
        verse: verse.into(),
        message: "Be still".into(),
        prayer: "Amen".into(),
    }
}

fn tracker(app: &Abide) -> TrackerProgress {
    app.store()
        .read(BIBLE_TRACKER_PROGRESS, TrackerProgress::default())
}

/// A store with something in every key.
fn populated() -> Abide {
    let app = Abide::in_memory();
    let mut journal = app.journal();
    journal.save(journal_entry("創世記", 1, true)).unwrap();
    journal.save(journal_entry("創世記", 2, false)).unwrap();
    let id = journal.records()[0].id.clone();
    journal.add_comment(&id, "Light first").unwrap();
    journal.toggle_like(&id).unwrap();

    let mut prayers = app.prayers();
    prayers
        .save(PrayerItem {
            id: "p1".into(),
            title: "Healing".into(),
            person: "Dad".into(),
            prayer_date: "2024-03-01".into(),
            ..Default::default()
        })
        .unwrap();

    app.notes()
        .save(MessageNote {
            id: "n1".into(),
            date: "2024-03-03".into(),
            title: "Abide in me".into(),
            tags: vec!["john".into()],
            ..Default::default()
        })
        .unwrap();

    app.shares()
        .save(SmallGroupShare {
            id: "s1".into(),
            date: "2024-03-04".into(),
            group_name: "Tuesday".into(),
            book: "Acts".into(),
            chapter: 2,
            ..Default::default()
        })
        .unwrap();

    let mut deck = app.cards(vec![card_content("John 15:4")]);
    deck.collect(JesusSaidCard::from_content(&card_content("John 15:4"), "2024-03-05"))
        .unwrap();

    app.plans().complete_day("gospels", 1).unwrap();
    app
}

#[test]
fn completed_entry_marks_chapter_and_earns_point() {
    let app = Abide::in_memory();
    let mut journal = app.journal();

    journal.save(journal_entry("創世記", 1, true)).unwrap();

    assert!(tracker(&app).is_read("創世記", 1));
    assert_eq!(app.store().read(GRACE_POINTS, 0), 1);
}

#[test]
fn deleting_entry_retracts_chapter_and_book() {
    let app = Abide::in_memory();
    let mut journal = app.journal();
    let entry = journal_entry("創世記", 1, true);
    journal.save(entry.clone()).unwrap();

    journal.request_delete([entry.id.clone()]);
    assert!(tracker(&app).is_read("創世記", 1));
    journal.confirm_delete().unwrap();

    let progress = tracker(&app);
    assert!(!progress.is_read("創世記", 1));
    assert_eq!(progress.books().count(), 0);
}

#[test]
fn draw_refused_with_two_points() {
    let app = Abide::in_memory();
    app.store().write(GRACE_POINTS, &2).unwrap();
    let deck = app.cards(vec![card_content("John 1:1")]);

    let err = deck.draw(&mut StdRng::seed_from_u64(0)).unwrap_err();
    assert!(matches!(
        err,
        AbideError::Draw(DrawError::InsufficientPoints { .. })
    ));
    assert_eq!(app.store().read(GRACE_POINTS, 0), 2);
}

#[test]
fn draw_with_five_points_and_one_card_left() {
    let app = Abide::in_memory();
    app.store().write(GRACE_POINTS, &5).unwrap();
    let mut deck = app.cards(vec![card_content("John 1:1"), card_content("John 11:35")]);
    deck.collect(JesusSaidCard::from_content(&card_content("John 1:1"), "2024-01-01"))
        .unwrap();

    let card = deck.draw(&mut StdRng::seed_from_u64(99)).unwrap();

    assert_eq!(card.verse, "John 11:35");
    assert_eq!(app.store().read(GRACE_POINTS, 0), 2);
}

#[test]
fn import_replaces_prayer_with_same_id() {
    let app = populated();
    let mut importer = app.importer();

    importer
        .import_str(
            r#"{"prayerItems": [{"id": "p1", "title": "Healed", "person": "Dad",
                "content": "", "prayerDate": "2024-03-01", "answered": true,
                "answeredDate": "2024-04-01", "likes": 0, "liked": false, "comments": []}]}"#,
        )
        .unwrap();

    let prayers = app.store().read(PRAYER_ITEMS, Vec::new());
    let matching: Vec<_> = prayers.iter().filter(|p| p.id == "p1").collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].title, "Healed");
    assert!(matching[0].answered);
    assert_eq!(matching[0].answered_date.as_deref(), Some("2024-04-01"));
}

#[test]
fn one_malformed_entry_does_not_cost_the_rest_of_the_journal() {
    let stored = r#"[
        {"id": "good", "date": "2024-01-01", "book": "John", "chapter": 1},
        {"id": "bad", "date": "2024-01-02", "comments": null}
    ]"#;
    let app = Abide::new(
        InMemoryStorage::new().with_item("journalEntries", stored),
        BindingOptions::default(),
    );
    let mut journal = app.journal();
    assert_eq!(journal.len(), 1);

    let mut new = journal_entry("John", 2, false);
    new.id = "new".into();
    journal.save(new).unwrap();

    let mut importer = app.importer();
    importer
        .import_str(r#"{"journalEntries": [{"id": "imported", "date": "2024-02-01"}]}"#)
        .unwrap();

    let ids: Vec<String> = app
        .store()
        .read_value("journalEntries")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["good", "new", "bad", "imported"]);
    assert_eq!(journal.len(), 3);
}

#[test]
fn export_then_import_into_empty_store_round_trips() {
    let source = populated();
    let exported = export_json(source.store()).unwrap();

    let target = Abide::in_memory();
    target.importer().import_str(&exported).unwrap();

    assert_eq!(
        ExportDocument::from_store(target.store()),
        ExportDocument::from_store(source.store())
    );
}

#[test]
fn importing_twice_equals_importing_once() {
    let exported = export_json(populated().store()).unwrap();

    let once = Abide::in_memory();
    once.importer().import_str(&exported).unwrap();

    let twice = Abide::in_memory();
    let mut importer = twice.importer();
    importer.import_str(&exported).unwrap();
    importer.import_str(&exported).unwrap();

    assert_eq!(
        ExportDocument::from_store(once.store()),
        ExportDocument::from_store(twice.store())
    );
}

#[test]
fn import_reloads_open_bindings() {
    let app = Abide::in_memory();
    let points = Binding::open(app.store(), GRACE_POINTS, 0);
    let prayers = app.prayers();

    app.importer()
        .import_str(r#"{"gracePoints": 6, "prayerItems": [{"id": "x", "title": "t"}]}"#)
        .unwrap();

    assert_eq!(points.get(), 6);
    assert_eq!(prayers.len(), 1);
}

#[test]
fn tracker_matches_completed_entries_after_random_edits() {
    const BOOKS: [&str; 3] = ["Ruth", "Jonah", "Mark"];
    let mut rng = StdRng::seed_from_u64(2024);
    let app = Abide::in_memory();
    let mut journal = app.journal();

    for _ in 0..200 {
        let records = journal.records();
        match rng.gen_range(0..4) {
            0 | 1 => {
                let entry = journal_entry(
                    BOOKS[rng.gen_range(0..BOOKS.len())],
                    rng.gen_range(1..4),
                    rng.gen_bool(0.6),
                );
                journal.save(entry).unwrap();
            }
            2 if !records.is_empty() => {
                let mut entry = records[rng.gen_range(0..records.len())].clone();
                entry.completed = !entry.completed;
                if rng.gen_bool(0.3) {
                    entry.chapter = rng.gen_range(1..4);
                }
                journal.save(entry).unwrap();
            }
            3 if !records.is_empty() => {
                let victim = records[rng.gen_range(0..records.len())].id.clone();
                journal.request_delete([victim]);
                journal.confirm_delete().unwrap();
            }
            _ => {}
        }

        let progress = tracker(&app);
        let remaining = journal.records();
        for book in BOOKS {
            for chapter in 1..4 {
                let expected = remaining
                    .iter()
                    .any(|e| e.completed && e.book == book && e.chapter == chapter);
                assert_eq!(progress.is_read(book, chapter), expected, "{book} {chapter}");
            }
        }
        assert!(progress.books().all(|b| !progress.read_chapters(b).is_empty()));
    }
}

#[test]
fn writes_reach_other_contexts_only_when_polled() {
    let tab_a = InMemoryStorage::new();
    let tab_b = tab_a.open_context();
    let app_a = Abide::new(tab_a, BindingOptions::synced());
    let app_b = Abide::new(tab_b, BindingOptions::synced());

    let prayers_b = app_b.prayers();
    app_a
        .prayers()
        .save(PrayerItem {
            id: "p".into(),
            ..Default::default()
        })
        .unwrap();

    assert!(prayers_b.is_empty());
    assert_eq!(app_b.poll_external(), 1);
    assert_eq!(prayers_b.len(), 1);
}

#[test]
fn directory_storage_syncs_between_processes() {
    let dir = tempfile::tempdir().unwrap();
    let first = Abide::new(
        DirectoryStorage::open(dir.path()).unwrap(),
        BindingOptions::synced(),
    );
    let second = Abide::new(
        DirectoryStorage::open(dir.path()).unwrap(),
        BindingOptions::synced(),
    );
    let tracker_b = second.tracker();

    first.tracker().toggle_chapter("Psalms", 23).unwrap();
    assert!(!tracker_b.progress().is_read("Psalms", 23));

    second.poll_external();
    assert!(tracker_b.progress().is_read("Psalms", 23));
}
