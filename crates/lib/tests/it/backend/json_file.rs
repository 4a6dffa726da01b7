use std::sync::Arc;

use persona::{
    Session,
    backend::{CacheBackend, JsonFile},
};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let mut session = session_over(Arc::new(JsonFile::open(&path).unwrap()));
        session
            .login(doc(json!({"accessToken": "T", "name": "Alice"})))
            .unwrap();
        session.set("name", "Alicia").unwrap();
    }

    let session = Session::builder()
        .cache_backend(JsonFile::open(&path).unwrap())
        .build()
        .unwrap();
    assert_eq!(session.access_token(), "T");
    assert_eq!(session.get("name"), Some(&json!("Alicia")));
}

#[test]
fn test_logout_removes_entry_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut session = session_over(Arc::new(JsonFile::open(&path).unwrap()));
    session.login(doc(json!({"accessToken": "T"}))).unwrap();
    session.logout().unwrap();

    let reopened = JsonFile::open(&path).unwrap();
    assert_eq!(reopened.get("user").unwrap(), None);
    assert_eq!(reopened.path(), path.as_path());
}

#[test]
fn test_unwritable_path_surfaces_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("session.json");

    let mut session = session_over(Arc::new(JsonFile::open(&path).unwrap()));
    let err = session.set("name", "Alice").unwrap_err();
    assert!(err.is_io_error());
    assert!(err.is_backend_error());
    assert_eq!(err.module(), "backend");
}
