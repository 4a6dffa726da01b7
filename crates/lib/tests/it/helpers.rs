use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use persona::{
    Result, Session,
    backend::{BackendError, CacheBackend, InMemory},
    doc::Doc,
    events::SessionEvents,
};
use serde_json::Value;

// ==========================
// SESSION FACTORIES
// ==========================

/// Builds a session with events enabled over `backend`.
pub fn session_over(backend: Arc<dyn CacheBackend>) -> Session {
    Session::builder()
        .shared_cache_backend(backend)
        .enable_events(true)
        .build()
        .expect("Failed to build session")
}

/// Builds a session with events enabled over a fresh in-memory backend.
pub fn test_session() -> Session {
    session_over(Arc::new(InMemory::new()))
}

/// Converts a `json!` literal into a document.
pub fn doc(value: Value) -> Doc {
    Doc::try_from(value).expect("Test document must be a JSON object")
}

// ==========================
// BACKENDS
// ==========================

/// Backend that counts writes and can be told to fail them.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    inner: InMemory,
    sets: AtomicUsize,
    removes: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Reads the stored value directly, bypassing failure injection.
    pub fn stored(&self, key: &str) -> Option<Value> {
        self.inner.get(key).expect("InMemory reads do not fail")
    }

    fn unavailable(&self) -> persona::Error {
        BackendError::Unavailable {
            reason: "injected failure".to_string(),
        }
        .into()
    }
}

impl CacheBackend for RecordingBackend {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(self.unavailable());
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(self.unavailable());
        }
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(self.unavailable());
        }
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key)
    }
}

// ==========================
// EVENT RECORDING
// ==========================

/// Ordered log of every event a notifier delivers, rendered as strings.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    /// Subscribes to all five events on `events`.
    pub fn attach(events: &SessionEvents) -> Self {
        let log = Self::default();

        let sink = log.clone();
        events.on_boot(move |data, _| {
            sink.push(format!("boot:{}", data.len()));
            Ok(())
        });
        let sink = log.clone();
        events.on_login(move |data, _| {
            sink.push(format!("login:{}", data.to_value()));
            Ok(())
        });
        let sink = log.clone();
        events.on_key_change(move |key, new_value, old_value, _| {
            sink.push(format!("keyChange:{key}:{new_value}:{old_value}"));
            Ok(())
        });
        let sink = log.clone();
        events.on_change(move |new_data, old_data, _| {
            sink.push(format!(
                "change:{}:{}",
                new_data.to_value(),
                old_data.to_value()
            ));
            Ok(())
        });
        let sink = log.clone();
        events.on_logout(move |_| {
            sink.push("logout".to_string());
            Ok(())
        });

        log
    }

    pub fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Entries starting with `prefix`.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.starts_with(prefix))
            .collect()
    }
}
