/*
[INPUT]:  Endpoint descriptors and trader actions
[OUTPUT]: Envelopes and acknowledgments from a real or scripted backend
[POS]:    Backend seam - the mockable boundary between transport and view model
[UPDATE]: When the set of backend operations changes
*/

use async_trait::async_trait;

use crate::http::{DeckClient, Result};
use crate::types::{ActionAck, ApiEnvelope, Endpoint, TraderAction};

/// Read and write operations the dashboard needs from the trading backend.
///
/// The orchestrator is generic over this trait so that a session can run
/// against [`DeckClient`] in production and a scripted double in tests
/// (`MockBackend`, behind the `test-util` feature).
#[async_trait]
pub trait DeckBackend: Send + Sync {
    /// Fetch one read endpoint
    async fn fetch(&self, endpoint: Endpoint) -> Result<ApiEnvelope>;

    /// Send one mutating call
    async fn perform(&self, action: &TraderAction) -> Result<ActionAck>;
}

#[async_trait]
impl DeckBackend for DeckClient {
    async fn fetch(&self, endpoint: Endpoint) -> Result<ApiEnvelope> {
        DeckClient::fetch(self, endpoint).await
    }

    async fn perform(&self, action: &TraderAction) -> Result<ActionAck> {
        DeckClient::perform(self, action).await
    }
}
