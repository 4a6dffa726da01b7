use std::sync::Arc;

use persona::backend::{CacheBackend, InMemory};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_session_round_trips_through_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let backend = Arc::new(InMemory::new());
    let mut session = session_over(backend.clone());
    session
        .login(doc(json!({"accessToken": "T", "name": "Alice"})))
        .unwrap();
    backend.save_to_file(&path).unwrap();

    let restored = session_over(Arc::new(InMemory::load_from_file(&path).unwrap()));
    assert_eq!(restored.all(), session.all());
    assert!(restored.is_logged_in());
}

#[test]
fn test_other_keys_are_untouched() {
    let backend = Arc::new(InMemory::with_entries([(
        "theme".to_string(),
        json!("dark"),
    )]));
    let mut session = session_over(backend.clone());

    session.set("name", "Alice").unwrap();
    session.logout().unwrap();

    assert_eq!(backend.keys().unwrap(), vec!["theme".to_string()]);
    assert_eq!(backend.get("theme").unwrap(), Some(json!("dark")));
}

#[test]
fn test_stores_exactly_what_was_set() {
    let backend = InMemory::new();
    let values = [
        json!(null),
        json!(0.5),
        json!("text"),
        json!([1, "two", {"three": 3}]),
        json!({"nested": {"deep": [true, false]}}),
    ];
    for (i, value) in values.iter().enumerate() {
        let key = format!("k{i}");
        backend.set(&key, value).unwrap();
        assert_eq!(backend.get(&key).unwrap().as_ref(), Some(value));
    }
    // A stored null is still an entry
    assert!(backend.contains("k0").unwrap());
}
