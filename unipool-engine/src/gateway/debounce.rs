//! Per-key debouncing for autocomplete-style lookups.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;

/// Debounces rapid repeat calls per key.
///
/// Each call takes a ticket for its key and then waits out the delay. When
/// the wait ends, the call settles only if no newer call for the same key
/// arrived in the meantime. Distinct keys never interfere.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    tickets: Mutex<HashMap<String, u64>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            tickets: Mutex::new(HashMap::new()),
        }
    }

    /// Wait out the delay for `key`.
    ///
    /// Returns `true` if this call is still the latest for the key once the
    /// delay has passed, `false` if a newer call superseded it.
    pub async fn settle(&self, key: &str) -> bool {
        let ticket = {
            let mut tickets = self.tickets.lock().await;
            let entry = tickets.entry(key.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        tokio::time::sleep(self.delay).await;

        let mut tickets = self.tickets.lock().await;
        if tickets.get(key) == Some(&ticket) {
            tickets.remove(key);
            true
        } else {
            false
        }
    }
}
