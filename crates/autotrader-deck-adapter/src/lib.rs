/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public dashboard adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod backend;
pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod types;
pub mod ws;

pub use backend::DeckBackend;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockBackend;

// Re-export commonly used types from http
pub use http::{ClientConfig, Credentials, DEFAULT_BASE_URL, DeckClient, DeckError, Result};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{ConnectionState, DEFAULT_PUSH_URL, PushChannel, PushMessage, PushPayload};
