//! Round-robin rotation over a set of API credentials.
//!
//! Providers with several keys spread requests across them. The rotation
//! cursor is the only shared-mutable state in the crate and is guarded by
//! a single mutex so the ring can be used from concurrent queries.

use std::sync::Mutex;

/// An owned set of API keys with a rotating cursor.
///
/// Keys are handed out in round-robin order; the cursor wraps after the
/// last key. Blank keys are dropped at construction so an empty ring
/// means "no credentials configured".
#[derive(Debug)]
pub struct KeyRing {
    keys: Vec<String>,
    cursor: Mutex<usize>,
}

impl KeyRing {
    /// Build a ring from the given keys, dropping blank entries.
    pub fn new(keys: Vec<String>) -> Self {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keys,
            cursor: Mutex::new(0),
        }
    }

    /// Build a ring from a comma-separated list.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(',').map(str::to_string).collect())
    }

    /// True if no usable key is configured.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of usable keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Hand out the next key in rotation, or `None` if the ring is empty.
    pub fn next_key(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let mut cursor = self
            .cursor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let key = self.keys[*cursor % self.keys.len()].clone();
        *cursor = (*cursor + 1) % self.keys.len();
        Some(key)
    }
}
