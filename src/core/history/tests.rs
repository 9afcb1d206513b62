use super::*;

fn store() -> (tempfile::TempDir, HistoryStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("history"));
    (dir, store)
}

fn new_entry<'a>(tool: ToolId, input: &'a str) -> NewEntry<'a> {
    NewEntry {
        tool,
        label: None,
        input,
        output: "out",
    }
}

#[test]
fn empty_store_lists_nothing() {
    let (_dir, store) = store();
    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.clear().unwrap(), 0);
}

#[test]
fn record_and_get() {
    let (_dir, store) = store();
    let entry = store
        .record(
            NewEntry {
                tool: ToolId::Translate,
                label: Some("→ Spanish".to_string()),
                input: "Hello world",
                output: "Hola mundo",
            },
            0,
        )
        .unwrap();
    assert_eq!(entry.title, "Hello world");

    let loaded = store.get(&entry.id).unwrap();
    assert_eq!(loaded, entry);
    assert_eq!(store.list().unwrap(), vec![entry.meta()]);
}

#[test]
fn title_is_truncated_preview() {
    let (_dir, store) = store();
    let long = "word ".repeat(40);
    let entry = store.record(new_entry(ToolId::AiChat, &long), 0).unwrap();
    assert!(entry.title.chars().count() <= TITLE_LEN);
    assert!(entry.title.starts_with("word word"));

    let blank = store.record(new_entry(ToolId::AiChat, "   "), 0).unwrap();
    assert_eq!(blank.title, "(No title)");
}

#[test]
fn list_is_newest_first() {
    let (_dir, store) = store();
    let a = store.record(new_entry(ToolId::AiChat, "first"), 0).unwrap();
    let b = store.record(new_entry(ToolId::AiChat, "second"), 0).unwrap();
    let c = store.record(new_entry(ToolId::AiChat, "third"), 0).unwrap();
    let ids: Vec<_> = store.list().unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);
}

#[test]
fn prune_keeps_newest() {
    let (_dir, store) = store();
    let first = store.record(new_entry(ToolId::AiChat, "one"), 2).unwrap();
    store.record(new_entry(ToolId::AiChat, "two"), 2).unwrap();
    store.record(new_entry(ToolId::AiChat, "three"), 2).unwrap();

    let titles: Vec<_> = store.list().unwrap().into_iter().map(|m| m.title).collect();
    assert_eq!(titles, vec!["three", "two"]);
    assert!(matches!(store.get(&first.id), Err(HistoryError::NotFound(_))));
    assert!(!store.dir().join(format!("entry_{}.json", first.id)).exists());
}

#[test]
fn get_by_prefix() {
    let (_dir, store) = store();
    let entry = store.record(new_entry(ToolId::Summarizer, "text"), 0).unwrap();
    let loaded = store.get(&entry.id[..8]).unwrap();
    assert_eq!(loaded.id, entry.id);
    assert!(matches!(store.get("zzzz"), Err(HistoryError::NotFound(_))));
    assert!(matches!(store.get(""), Err(HistoryError::NotFound(_))));
}

#[test]
fn delete_and_clear() {
    let (_dir, store) = store();
    let a = store.record(new_entry(ToolId::AiChat, "a"), 0).unwrap();
    let b = store.record(new_entry(ToolId::Proofreader, "b"), 0).unwrap();

    assert_eq!(store.delete(&a.id).unwrap(), a.id);
    assert_eq!(store.list().unwrap(), vec![b.meta()]);
    assert!(matches!(store.delete(&a.id), Err(HistoryError::NotFound(_))));

    store.record(new_entry(ToolId::AiChat, "c"), 0).unwrap();
    assert_eq!(store.clear().unwrap(), 2);
    assert!(store.list().unwrap().is_empty());
    assert!(!store.dir().join(format!("entry_{}.json", b.id)).exists());
}

#[test]
fn filter_by_tool_and_query() {
    let (_dir, store) = store();
    store.record(new_entry(ToolId::AiChat, "Rust ownership"), 0).unwrap();
    store.record(new_entry(ToolId::Translate, "rust is a language"), 0).unwrap();
    store.record(new_entry(ToolId::Translate, "Good morning"), 0).unwrap();
    let all = store.list().unwrap();

    assert_eq!(filter_entries(&all, None, "").len(), 3);
    assert_eq!(filter_entries(&all, None, "RUST").len(), 2);
    assert_eq!(filter_entries(&all, Some(ToolId::Translate), "").len(), 2);
    let hits = filter_entries(&all, Some(ToolId::Translate), "rust");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "rust is a language");
}

#[test]
fn corrupt_index_is_an_error() {
    let (_dir, store) = store();
    std::fs::create_dir_all(store.dir()).unwrap();
    std::fs::write(store.dir().join("index.json"), "not json").unwrap();
    assert!(matches!(store.list(), Err(HistoryError::Json(_))));
}

#[test]
fn missing_entry_file_reports_not_found() {
    let (_dir, store) = store();
    let entry = store.record(new_entry(ToolId::AiChat, "gone"), 0).unwrap();
    std::fs::remove_file(store.dir().join(format!("entry_{}.json", entry.id))).unwrap();
    assert!(matches!(store.get(&entry.id), Err(HistoryError::NotFound(_))));
    // Delete still cleans up the index.
    store.delete(&entry.id).unwrap();
    assert!(store.list().unwrap().is_empty());
}
