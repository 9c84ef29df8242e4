/*
[INPUT]:  Scripted envelopes, acknowledgments, failures and delays
[OUTPUT]: A DeckBackend that replays the script and records every call
[POS]:    Backend seam - test double, compiled only with the test-util feature
[UPDATE]: When DeckBackend gains an operation
*/

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::backend::DeckBackend;
use crate::http::{DeckError, Result};
use crate::types::{ActionAck, ApiEnvelope, Endpoint, TraderAction};

#[derive(Debug, Clone)]
enum Scripted<T> {
    Reply(T),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockScript {
    reads: HashMap<&'static str, Scripted<ApiEnvelope>>,
    delays: HashMap<&'static str, Duration>,
    actions: HashMap<&'static str, Scripted<ActionAck>>,
    calls: Vec<String>,
}

/// Scripted backend for tests.
///
/// Endpoints and actions are keyed by their stable names. Unscripted
/// endpoints fail with a 404 API error; unscripted actions are accepted.
#[derive(Debug, Default)]
pub struct MockBackend {
    script: Mutex<MockScript>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `endpoint` with a successful envelope around `data`
    pub fn respond(&self, endpoint: &'static str, data: Value) -> &Self {
        self.respond_envelope(endpoint, ApiEnvelope::ok(data))
    }

    /// Answer `endpoint` with an arbitrary envelope
    pub fn respond_envelope(&self, endpoint: &'static str, envelope: ApiEnvelope) -> &Self {
        self.with_script(|script| {
            script.reads.insert(endpoint, Scripted::Reply(envelope));
        });
        self
    }

    /// Make `endpoint` fail at the transport level
    pub fn fail(&self, endpoint: &'static str, reason: &str) -> &Self {
        self.with_script(|script| {
            script.reads.insert(endpoint, Scripted::Fail(reason.to_string()));
        });
        self
    }

    /// Hold `endpoint`'s answer back for `delay`
    pub fn delay(&self, endpoint: &'static str, delay: Duration) -> &Self {
        self.with_script(|script| {
            script.delays.insert(endpoint, delay);
        });
        self
    }

    /// Answer `action` with `ack`
    pub fn acknowledge(&self, action: &'static str, ack: ActionAck) -> &Self {
        self.with_script(|script| {
            script.actions.insert(action, Scripted::Reply(ack));
        });
        self
    }

    /// Make `action` fail at the transport level
    pub fn fail_action(&self, action: &'static str, reason: &str) -> &Self {
        self.with_script(|script| {
            script.actions.insert(action, Scripted::Fail(reason.to_string()));
        });
        self
    }

    /// Names of every endpoint and action called so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.script
            .lock()
            .map(|script| script.calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| call.as_str() == name).count()
    }

    fn with_script(&self, f: impl FnOnce(&mut MockScript)) {
        if let Ok(mut script) = self.script.lock() {
            f(&mut script);
        }
    }

    fn take_read(&self, endpoint: Endpoint) -> (Option<Scripted<ApiEnvelope>>, Option<Duration>) {
        match self.script.lock() {
            Ok(mut script) => {
                script.calls.push(endpoint.name().to_string());
                (
                    script.reads.get(endpoint.name()).cloned(),
                    script.delays.get(endpoint.name()).copied(),
                )
            }
            Err(_) => (None, None),
        }
    }
}

#[async_trait]
impl DeckBackend for MockBackend {
    async fn fetch(&self, endpoint: Endpoint) -> Result<ApiEnvelope> {
        let (reply, delay) = self.take_read(endpoint);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Some(Scripted::Reply(envelope)) => Ok(envelope),
            Some(Scripted::Fail(reason)) => Err(DeckError::InvalidResponse(reason)),
            None => Err(DeckError::Api {
                code: 404,
                message: format!("no script for {endpoint}"),
            }),
        }
    }

    async fn perform(&self, action: &TraderAction) -> Result<ActionAck> {
        let reply = match self.script.lock() {
            Ok(mut script) => {
                script.calls.push(action.name().to_string());
                script.actions.get(action.name()).cloned()
            }
            Err(_) => None,
        };
        match reply {
            Some(Scripted::Reply(ack)) => Ok(ack),
            Some(Scripted::Fail(reason)) => Err(DeckError::InvalidResponse(reason)),
            None => Ok(ActionAck::accepted()),
        }
    }
}
