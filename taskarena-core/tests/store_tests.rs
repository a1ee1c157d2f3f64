//! File store integration tests: filter evaluation, identity tagging
//! through the adapter, and schema migration on open.

use rstest::rstest;
use tempfile::TempDir;

use taskarena_core::{
    ArenaName, FieldTag, FileStore, Filter, Record, RecordStore, SharedRecord,
};

fn seeded_store(dir: &TempDir) -> FileStore {
    let mut store = FileStore::open(dir.path().join("data")).expect("open");
    let mut walls = Record::new("paint walls");
    walls.set_field(FieldTag::Project, "house");
    walls.set_field(FieldTag::Priority, "H");
    store.add_record(walls).expect("add");

    let mut floor = Record::new("clean floor");
    floor.set_field(FieldTag::Project, "house");
    floor.set_field(FieldTag::Status, "pending");
    store.add_record(floor).expect("add");

    let mut ceiling = Record::new("paint ceiling");
    ceiling.set_field(FieldTag::Project, "office");
    ceiling.arena = Some(ArenaName::from("work"));
    store.add_record(ceiling).expect("add");

    store
}

#[rstest]
#[case::all(&[], 3)]
#[case::substring(&["paint"], 2)]
#[case::project(&["project:house"], 2)]
#[case::priority(&["priority:H"], 1)]
#[case::status(&["status:pending"], 1)]
#[case::conjunction(&["paint", "project:house"], 1)]
#[case::arena(&["arena:work"], 1)]
#[case::no_match(&["project:garden"], 0)]
fn filter_selects_expected_records(#[case] terms: &[&str], #[case] expected: usize) {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let hits = store
        .query(&Filter::new(terms.iter().copied()))
        .expect("query");
    assert_eq!(hits.len(), expected, "filter {terms:?}");
}

#[test]
fn membership_roundtrip_through_the_adapter() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);
    let arena = ArenaName::from("house");

    // Tag every "paint" record, as `add <arena> paint` would.
    let mut tagged = store.query(&Filter::new(["paint"])).expect("query");
    for task in &mut tagged {
        task.join(&arena);
        assert!(task.save(&mut store).is_saved());
    }

    let members = store
        .query(&Filter::all().and_arena(&arena))
        .expect("query members");
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|t| t.token().is_some()));

    // Untag one of them, as `remove` would. The record itself survives.
    let mut first = members.into_iter().next().unwrap();
    first.leave();
    assert!(first.save(&mut store).is_saved());

    assert_eq!(
        store
            .query(&Filter::all().and_arena(&arena))
            .expect("query")
            .len(),
        1
    );
    assert_eq!(store.query(&Filter::all()).expect("query").len(), 3);
}

#[test]
fn tokens_survive_store_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);
    let arena = ArenaName::from("house");

    let mut task = store
        .query(&Filter::new(["clean floor"]))
        .expect("query")
        .pop()
        .expect("present");
    task.join(&arena);
    let token = task.token().expect("assigned");
    assert!(task.save(&mut store).is_saved());

    let reloaded = store
        .query(&Filter::new(["clean floor"]))
        .expect("query")
        .pop()
        .expect("present");
    assert_eq!(reloaded.token(), Some(token));
}

#[test]
fn insert_gives_fresh_store_identity() {
    let dir = TempDir::new().unwrap();
    let mut local = FileStore::open(dir.path().join("local")).expect("open");
    let mut remote = FileStore::open(dir.path().join("remote")).expect("open");

    let mut template = SharedRecord::new(Record::new("paint walls"));
    template.record.set_field(FieldTag::Due, "2026-09-01");
    template.join(&ArenaName::from("house"));
    local.add_record(template.record.clone()).expect("seed local");

    let created = remote.insert(&template).expect("insert");
    assert_eq!(created.record.field(FieldTag::Due), "2026-09-01");
    assert_ne!(created.record.uuid, template.record.uuid);
    assert_eq!(created.record.id, Some(1), "remote ids start fresh");
    assert!(created.token().is_none());
}

#[test]
fn two_stores_under_one_root_stay_independent() {
    let dir = TempDir::new().unwrap();
    let mut local = FileStore::open(dir.path().join("local")).expect("open");
    let remote = FileStore::open(dir.path().join("remote")).expect("open");

    local.add_record(Record::new("only local")).expect("add");
    assert_eq!(local.query(&Filter::all()).expect("query").len(), 1);
    assert!(remote.query(&Filter::all()).expect("query").is_empty());
}
