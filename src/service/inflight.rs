//! Per-entity update serialization.
//!
//! Each read-modify-write cycle holds a claim on the entity key for its
//! duration. A second claim on the same key fails fast with `Error::Busy`
//! instead of interleaving writes.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};

#[derive(Default)]
pub struct InFlight {
    keys: Mutex<HashSet<String>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    fn keys(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims `key` until the returned guard is dropped.
    pub fn claim(&self, key: impl Into<String>) -> Result<Claim<'_>> {
        let key = key.into();
        if !self.keys().insert(key.clone()) {
            return Err(Error::Busy(key));
        }
        Ok(Claim { owner: self, key })
    }

    pub fn is_claimed(&self, key: &str) -> bool {
        self.keys().contains(key)
    }
}

/// Releases its key on drop.
pub struct Claim<'a> {
    owner: &'a InFlight,
    key: String,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.owner.keys().remove(&self.key);
    }
}

/// Claim key for a character.
pub fn character_key(id: &str) -> String {
    format!("character:{}", id)
}

/// Claim key for a guild.
pub fn guild_key(id: &str) -> String {
    format!("guild:{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_second_claim_is_busy() {
        let inflight = InFlight::new();
        let _claim = inflight.claim("character:hero").unwrap();
        assert!(matches!(
            inflight.claim("character:hero"),
            Err(Error::Busy(key)) if key == "character:hero"
        ));
    }

    #[test]
    fn test_claim_released_on_drop() {
        let inflight = InFlight::new();
        {
            let _claim = inflight.claim("guild:owls").unwrap();
            assert!(inflight.is_claimed("guild:owls"));
        }
        assert!(!inflight.is_claimed("guild:owls"));
        assert!(inflight.claim("guild:owls").is_ok());
    }

    #[test]
    fn test_distinct_keys_do_not_block() {
        let inflight = InFlight::new();
        let _a = inflight.claim(character_key("a")).unwrap();
        let _b = inflight.claim(character_key("b")).unwrap();
        let _g = inflight.claim(guild_key("a")).unwrap();
    }

    #[test]
    fn test_concurrent_claims_never_overlap() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let inflight = Arc::new(InFlight::new());
        let holders = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let inflight = Arc::clone(&inflight);
                let holders = Arc::clone(&holders);
                let overlaps = Arc::clone(&overlaps);
                thread::spawn(move || {
                    for _ in 0..100 {
                        if let Ok(claim) = inflight.claim("character:hero") {
                            if holders.fetch_add(1, Ordering::SeqCst) > 0 {
                                overlaps.fetch_add(1, Ordering::SeqCst);
                            }
                            thread::yield_now();
                            holders.fetch_sub(1, Ordering::SeqCst);
                            drop(claim);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert!(!inflight.is_claimed("character:hero"));
    }
}
