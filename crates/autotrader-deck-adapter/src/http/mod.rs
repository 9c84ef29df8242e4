/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod actions;
pub mod client;
pub mod endpoints;
pub mod error;

pub use error::{DeckError, Result};

pub use client::{ClientConfig, Credentials, DeckClient, DEFAULT_BASE_URL};
