//! Constants used throughout the Persona library.
//!
//! Central definitions for default keys and the event topic format.

/// Default backend key the session document is stored under.
pub const DEFAULT_CACHE_KEY: &str = "user";

/// Default document path holding the access token.
pub const DEFAULT_ACCESS_TOKEN_KEY: &str = "accessToken";

/// Separator between the components of a document path.
pub const PATH_SEPARATOR: char = '.';

/// Separator between an events namespace and the event tag in a topic name.
pub const TOPIC_SEPARATOR: char = '.';

/// Version written into persisted backend files.
pub const PERSISTENCE_VERSION: u8 = 0;
