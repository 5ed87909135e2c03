//! Unit tests for the SQLite component store.

use chrono::{NaiveDate, Utc};
use component_library_api::models::{ComponentPatch, ComponentStatus, NewComponent};
use component_library_api::storage::{ComponentStore, StorageError};
use uuid::Uuid;

fn store() -> ComponentStore {
    ComponentStore::in_memory().expect("in-memory store")
}

fn new_component(name: &str, code: &str) -> NewComponent {
    NewComponent {
        name: name.to_string(),
        code: code.to_string(),
        ..Default::default()
    }
}

fn date_patch(date: &str) -> ComponentPatch {
    ComponentPatch {
        date_added: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        ..Default::default()
    }
}

#[test]
fn create_assigns_id_and_todays_date() {
    let store = store();

    let component = store.create(new_component("Card", "<div></div>")).unwrap();

    assert_eq!(component.date_added, Utc::now().date_naive());
    assert_eq!(component.status, ComponentStatus::NotStarted);

    let fetched = store.get(component.id).unwrap();
    assert_eq!(fetched.name, "Card");
    assert_eq!(fetched.code, "<div></div>");
}

#[test]
fn create_persists_supplied_fields_verbatim() {
    let store = store();

    let fields = NewComponent {
        name: "Hero".to_string(),
        section: "Landing".to_string(),
        tags: "widget,table".to_string(),
        code: "<section/>".to_string(),
        description: "desc".to_string(),
        notes: "notes".to_string(),
        instructions: "steps".to_string(),
        status: ComponentStatus::InProgress,
    };
    let component = store.create(fields).unwrap();

    let fetched = store.get(component.id).unwrap();
    assert_eq!(fetched.section, "Landing");
    assert_eq!(fetched.tags, "widget,table");
    assert_eq!(fetched.tag_list(), vec!["widget", "table"]);
    assert_eq!(fetched.description, "desc");
    assert_eq!(fetched.notes, "notes");
    assert_eq!(fetched.instructions, "steps");
    assert_eq!(fetched.status, ComponentStatus::InProgress);
}

#[test]
fn get_missing_component_is_not_found() {
    let store = store();

    let err = store.get(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[test]
fn list_orders_by_date_desc_then_name_asc() {
    let store = store();

    let bravo = store.create(new_component("Bravo", "b")).unwrap();
    let alpha = store.create(new_component("Alpha", "a")).unwrap();
    let newer = store.create(new_component("Zed", "z")).unwrap();

    store.update(bravo.id, date_patch("2024-06-01")).unwrap();
    store.update(alpha.id, date_patch("2024-06-01")).unwrap();
    store.update(newer.id, date_patch("2024-07-01")).unwrap();

    let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Zed", "Alpha", "Bravo"]);
}

#[test]
fn update_touches_only_supplied_fields() {
    let store = store();

    let fields = NewComponent {
        name: "Card".to_string(),
        section: "Landing".to_string(),
        tags: "widget".to_string(),
        code: "<div/>".to_string(),
        status: ComponentStatus::InProgress,
        ..Default::default()
    };
    let component = store.create(fields).unwrap();

    let patch = ComponentPatch {
        notes: Some("remember the aria labels".to_string()),
        ..Default::default()
    };
    let updated = store.update(component.id, patch).unwrap();

    assert_eq!(updated.notes, "remember the aria labels");
    assert_eq!(updated.name, "Card");
    assert_eq!(updated.section, "Landing");
    assert_eq!(updated.tags, "widget");
    assert_eq!(updated.code, "<div/>");
    assert_eq!(updated.status, ComponentStatus::InProgress);
    assert_eq!(updated.date_added, component.date_added);
}

#[test]
fn update_applies_date_override() {
    let store = store();
    let component = store.create(new_component("Card", "c")).unwrap();

    let updated = store.update(component.id, date_patch("2024-01-15")).unwrap();
    assert_eq!(updated.date_added.to_string(), "2024-01-15");

    let fetched = store.get(component.id).unwrap();
    assert_eq!(fetched.date_added.to_string(), "2024-01-15");
}

#[test]
fn update_missing_component_is_not_found() {
    let store = store();

    let err = store
        .update(Uuid::new_v4(), ComponentPatch::default())
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[test]
fn delete_removes_component_and_cascades_to_files() {
    let store = store();
    let component = store.create(new_component("Card", "c")).unwrap();

    store
        .add_file(component.id, "a.png", "/media/a.png", 3)
        .unwrap();
    store
        .add_file(component.id, "b.png", "/media/b.png", 5)
        .unwrap();
    assert_eq!(store.files_for(component.id).unwrap().len(), 2);

    store.delete(component.id).unwrap();

    assert!(matches!(
        store.get(component.id),
        Err(StorageError::NotFound { .. })
    ));
    assert!(store.files_for(component.id).unwrap().is_empty());

    // Second delete of the same id fails.
    assert!(matches!(
        store.delete(component.id),
        Err(StorageError::NotFound { .. })
    ));
}

#[test]
fn add_file_requires_existing_owner() {
    let store = store();

    let err = store
        .add_file(Uuid::new_v4(), "a.png", "/media/a.png", 3)
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[test]
fn files_are_listed_in_creation_order() {
    let store = store();
    let component = store.create(new_component("Card", "c")).unwrap();

    let first = store
        .add_file(component.id, "one.txt", "/media/one.txt", 1)
        .unwrap();
    let second = store
        .add_file(component.id, "two.txt", "/media/two.txt", 2)
        .unwrap();
    let third = store
        .add_file(component.id, "three.txt", "/media/three.txt", 3)
        .unwrap();
    assert!(first.id < second.id && second.id < third.id);

    let names: Vec<String> = store
        .files_for(component.id)
        .unwrap()
        .into_iter()
        .map(|f| f.file_name)
        .collect();
    assert_eq!(names, vec!["one.txt", "two.txt", "three.txt"]);
}

#[test]
fn files_for_component_without_attachments_is_empty() {
    let store = store();
    let component = store.create(new_component("Card", "c")).unwrap();

    assert!(store.files_for(component.id).unwrap().is_empty());
}
