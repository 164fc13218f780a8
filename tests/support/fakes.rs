//! In-memory fakes for the secret store and key generator.
//!
//! Both write to a shared [`Journal`] so tests can assert the exact
//! interleaving of writes and key generation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use keyrot::core::keygen::{KeyPair, KeyPairGenerator};
use keyrot::core::sink::{EncryptionKey, RotationResult, SealedPayload, SecretSink};
use keyrot::error::{GenerationError, PublishError};
use zeroize::Zeroizing;

/// One observable call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Publish {
        slot: String,
        value: String,
        visibility: Option<String>,
        selected_repository_ids: Option<Vec<u64>>,
    },
    Generate {
        passphrase: String,
    },
}

impl Event {
    pub fn slot(&self) -> Option<&str> {
        match self {
            Event::Publish { slot, .. } => Some(slot),
            Event::Generate { .. } => None,
        }
    }
}

/// Shared, ordered call log.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn record(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    /// Slot names written, in order.
    pub fn slots(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| e.slot().map(str::to_string))
            .collect()
    }

    /// Value written to `slot` (last write wins).
    pub fn value_of(&self, slot: &str) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Publish {
                slot: s, value, ..
            } if s == slot => Some(value),
            _ => None,
        })
    }

    pub fn publish_count(&self) -> usize {
        self.slots().len()
    }

    pub fn generate_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Generate { .. }))
            .count()
    }
}

enum Scripted {
    Status(u16, String),
    Unreachable,
}

/// Secret store that records writes and answers from a script.
///
/// Unscripted slots answer `200 ok`.
pub struct FakeSink {
    journal: Journal,
    organization: bool,
    script: Mutex<HashMap<String, Scripted>>,
}

impl FakeSink {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            organization: false,
            script: Mutex::new(HashMap::new()),
        }
    }

    pub fn organization(mut self) -> Self {
        self.organization = true;
        self
    }

    /// Answer writes to `slot` with `status`.
    pub fn respond(self, slot: &str, status: u16, data: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(slot.to_string(), Scripted::Status(status, data.to_string()));
        self
    }

    /// Fail writes to `slot` without a response.
    pub fn unreachable(self, slot: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(slot.to_string(), Scripted::Unreachable);
        self
    }
}

#[async_trait]
impl SecretSink for FakeSink {
    async fn encryption_key(&self) -> Result<EncryptionKey, PublishError> {
        Ok(EncryptionKey {
            key_id: "fake-key".to_string(),
            key: String::new(),
        })
    }

    fn prepare(
        &self,
        key: &EncryptionKey,
        _name: &str,
        value: &str,
    ) -> Result<SealedPayload, PublishError> {
        Ok(SealedPayload::new(value.to_string(), key.key_id.clone()))
    }

    async fn publish(
        &self,
        payload: SealedPayload,
        name: &str,
    ) -> Result<RotationResult, PublishError> {
        self.journal.record(Event::Publish {
            slot: name.to_string(),
            value: payload.encrypted_value,
            visibility: payload.visibility.map(str::to_string),
            selected_repository_ids: payload.selected_repository_ids,
        });

        match self.script.lock().unwrap().get(name) {
            Some(Scripted::Status(status, data)) => Ok(RotationResult::new(*status, data.clone())),
            Some(Scripted::Unreachable) => Err(PublishError::Transport {
                name: name.to_string(),
                message: "connection refused".to_string(),
            }),
            None => Ok(RotationResult::new(200, "ok")),
        }
    }

    fn is_organization_scoped(&self) -> bool {
        self.organization
    }
}

/// Generator producing numbered placeholder keys.
pub struct FakeGenerator {
    journal: Journal,
    calls: Mutex<usize>,
    fail_on: Option<usize>,
}

impl FakeGenerator {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            calls: Mutex::new(0),
            fail_on: None,
        }
    }

    /// Fail the `n`th call (1-based).
    pub fn failing_on(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }
}

#[async_trait]
impl KeyPairGenerator for FakeGenerator {
    async fn generate(&self, passphrase: &str) -> Result<KeyPair, GenerationError> {
        self.journal.record(Event::Generate {
            passphrase: passphrase.to_string(),
        });

        let n = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail_on == Some(n) {
            return Err(GenerationError::Task("entropy source unavailable".to_string()));
        }

        Ok(KeyPair {
            public_key: format!("NEW_PUBLIC_{}", n),
            private_key: Zeroizing::new(format!("NEW_PRIVATE_{}", n)),
        })
    }
}
