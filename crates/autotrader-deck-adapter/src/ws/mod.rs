/*
[INPUT]:  Push-channel URL
[OUTPUT]: Live state updates and connection health
[POS]:    WebSocket layer - real-time data streams
[UPDATE]: When adding new message types or changing connection logic
*/

pub mod client;
pub mod message;

pub use client::{ConnectionState, DEFAULT_PUSH_URL, PushChannel};
pub use message::{PushMessage, PushPayload};
