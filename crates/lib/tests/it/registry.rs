use std::{sync::Arc, thread};

use persona::registry::{self, SessionRegistry};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_current_session_shared_across_threads() {
    let registry = Arc::new(SessionRegistry::new());
    registry.init(test_session());

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let current = registry.require().unwrap();
                current
                    .lock()
                    .unwrap()
                    .set(&format!("worker{i}"), true)
                    .unwrap();
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let current = registry.require().unwrap();
    assert_eq!(current.lock().unwrap().all().len(), 4);
}

#[test]
fn test_registered_session_keeps_observers() {
    let registry = SessionRegistry::new();
    let session = test_session();
    let log = EventLog::attach(session.events());
    registry.init(session);

    registry
        .require()
        .unwrap()
        .lock()
        .unwrap()
        .login(doc(json!({"accessToken": "T"})))
        .unwrap();

    assert_eq!(log.matching("login").len(), 1);
}

#[test]
fn test_global_registry() {
    // The only test touching the process-wide slot
    let global = registry::global();
    assert!(std::ptr::eq(global, registry::global()));

    global.init(test_session());
    assert!(global.is_initialized());
    global.reset();
    assert!(global.require().unwrap_err().is_not_found());
}
