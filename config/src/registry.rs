//! In-process token registry.

use inputs_core::{Credential, TokenRegistrar};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Keeps the latest credential per context id.
#[derive(Debug, Default)]
pub struct InMemoryTokenRegistry {
    tokens: Mutex<HashMap<String, Credential>>,
    registrations: Mutex<usize>,
}

impl InMemoryTokenRegistry {
    pub fn get(&self, context_id: &str) -> Option<Credential> {
        self.tokens.lock().get(context_id).cloned()
    }

    /// Number of `register` calls seen so far.
    pub fn registrations(&self) -> usize {
        *self.registrations.lock()
    }
}

impl TokenRegistrar for InMemoryTokenRegistry {
    fn register(&self, context_id: &str, credential: &Credential) {
        self.tokens
            .lock()
            .insert(context_id.to_string(), credential.clone());
        *self.registrations.lock() += 1;
    }
}
