//! Boot, login and logout against a shared backend.

use std::sync::Arc;

use persona::{Session, SessionConfig, backend::CacheBackend};
use serde_json::{Value, json};

use crate::helpers::*;

#[test]
fn test_boot_hydrates_from_backend() {
    let backend = RecordingBackend::new();
    backend
        .set("user", &json!({"accessToken": "abc", "name": "Alice"}))
        .unwrap();

    let session = session_over(backend.clone());
    assert!(session.is_logged_in());
    assert_eq!(session.access_token(), "abc");
    assert_eq!(session.get("name"), Some(&json!("Alice")));
    // Booting only reads
    assert_eq!(backend.sets(), 1);
}

#[test]
fn test_boot_uses_configured_cache_key() {
    let backend = RecordingBackend::new();
    backend.set("user", &json!({"accessToken": "u"})).unwrap();
    backend.set("admin", &json!({"accessToken": "a"})).unwrap();

    let config = SessionConfig {
        cache_key: "admin".to_string(),
        ..SessionConfig::default()
    };
    let session = Session::with_config(backend, config).unwrap();
    assert_eq!(session.access_token(), "a");
}

#[test]
fn test_reboot_fires_boot_again() {
    let mut session = test_session();
    let log = EventLog::attach(session.events());

    session.set("name", "Alice").unwrap();
    session.boot().unwrap();

    assert_eq!(log.matching("boot"), vec!["boot:1".to_string()]);
}

#[test]
fn test_boot_read_failure_propagates() {
    let backend = RecordingBackend::new();
    backend.fail_reads(true);

    let err = Session::builder()
        .shared_cache_backend(backend)
        .build()
        .unwrap_err();
    assert!(err.is_backend_error());
}

#[test]
fn test_login_ordering() {
    let mut session = test_session();
    let log = EventLog::attach(session.events());

    session
        .login(doc(json!({"accessToken": "T", "name": "Alice"})))
        .unwrap();

    assert_eq!(
        log.entries(),
        vec![
            r#"login:{"accessToken":"T","name":"Alice"}"#.to_string(),
            r#"keyChange:accessToken:"T":null"#.to_string(),
            r#"keyChange:name:"Alice":null"#.to_string(),
            r#"change:{"accessToken":"T","name":"Alice"}:{}"#.to_string(),
        ]
    );
    assert!(session.is_logged_in());
}

#[test]
fn test_login_persists_document() {
    let backend = RecordingBackend::new();
    let mut session = session_over(backend.clone());

    session
        .login(doc(json!({"accessToken": "T", "roles": ["admin"]})))
        .unwrap();

    assert_eq!(
        backend.stored("user"),
        Some(json!({"accessToken": "T", "roles": ["admin"]}))
    );
    let rebooted = session_over(backend);
    assert_eq!(rebooted.all(), session.all());
}

#[test]
fn test_login_keeps_existing_token_when_payload_has_none() {
    let mut session = test_session();
    session.set_access_token("T1").unwrap();

    session.login(doc(json!({"name": "Alice"}))).unwrap();
    assert_eq!(session.access_token(), "T1");
}

#[test]
fn test_logout_twice() {
    let backend = RecordingBackend::new();
    let mut session = session_over(backend.clone());
    session.login(doc(json!({"accessToken": "T"}))).unwrap();
    let log = EventLog::attach(session.events());

    session.logout().unwrap();
    session.logout().unwrap();

    assert_eq!(log.entries(), vec!["logout", "logout"]);
    assert_eq!(backend.removes(), 2);
    assert_eq!(backend.stored("user"), None);
    assert!(session.all().is_empty());
    assert!(session.is_not_logged_in());
}

#[test]
fn test_logout_keeps_permissions() {
    let mut session = test_session();
    session.set_permissions(doc(json!({"reports": {"view": true}})));
    session.logout().unwrap();
    assert!(session.can("reports.view"));
}

#[test]
fn test_sessions_with_separate_keys_share_backend() {
    let backend: Arc<dyn CacheBackend> = RecordingBackend::new();
    let mut user = session_over(backend.clone());
    let mut admin = Session::builder()
        .shared_cache_backend(backend.clone())
        .cache_key("admin")
        .build()
        .unwrap();

    user.login(doc(json!({"accessToken": "u"}))).unwrap();
    admin.login(doc(json!({"accessToken": "a"}))).unwrap();
    user.logout().unwrap();

    assert_eq!(backend.get("user").unwrap(), None);
    assert_eq!(
        backend.get("admin").unwrap(),
        Some(json!({"accessToken": "a"}))
    );
    assert_eq!(admin.get_or("accessToken", Value::Null), json!("a"));
}
