use persona::doc::{Doc, DocError, PathBuf};
use serde_json::{Value, json};

use crate::helpers::*;

#[test]
fn test_session_set_into_array_element() {
    let mut session = test_session();
    session
        .set("addresses", json!([{"city": "Lisbon"}, {"city": "Porto"}]))
        .unwrap();

    session.set("addresses.1.city", "Faro").unwrap();
    assert_eq!(session.get("addresses.1.city"), Some(&json!("Faro")));
    assert_eq!(session.get("addresses.0.city"), Some(&json!("Lisbon")));
}

#[test]
fn test_session_set_past_array_end_fails_without_write() {
    let backend = RecordingBackend::new();
    let mut session = session_over(backend.clone());
    session.set("tags", json!(["a"])).unwrap();
    let writes = backend.sets();

    let err = session.set("tags.3", "d").unwrap_err();
    assert!(err.is_data_error());
    assert_eq!(err.module(), "doc");
    assert_eq!(backend.sets(), writes);
    assert_eq!(session.get("tags"), Some(&json!(["a"])));
}

#[test]
fn test_set_replaces_scalar_intermediate() {
    let mut session = test_session();
    session.set("profile", "placeholder").unwrap();
    session.set("profile.city", "Lisbon").unwrap();
    assert_eq!(session.get("profile"), Some(&json!({"city": "Lisbon"})));
}

#[test]
fn test_doc_conversions() {
    assert!(Doc::try_from(Value::Null).unwrap().is_empty());
    assert_eq!(
        Doc::try_from(json!([1])).unwrap_err(),
        DocError::NotAnObject { found: "array" }
    );

    let built: Doc = [("a".to_string(), json!(1))].into_iter().collect();
    let value: Value = built.clone().into();
    assert_eq!(value, json!({"a": 1}));
    assert_eq!(doc(value), built);
}

#[test]
fn test_typed_reads() {
    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Address {
        city: String,
        zip: u32,
    }

    let user = doc(json!({"address": {"city": "Lisbon", "zip": 1000}}));
    assert_eq!(
        user.get_as::<Address>("address"),
        Some(Address {
            city: "Lisbon".to_string(),
            zip: 1000
        })
    );
    assert_eq!(user.get_as::<u32>("address.city"), None);
}

#[test]
fn test_path_normalization() {
    let path = PathBuf::from(".profile..address.");
    assert_eq!(path.as_str(), "profile.address");
    assert_eq!(path.len(), 2);
    assert_eq!(path.last(), Some("address"));
    assert!(PathBuf::from("...").is_empty());
}
