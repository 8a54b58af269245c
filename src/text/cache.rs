//! Content-hash memoization for the text parsers.
//!
//! Both parsers are pure functions of their input string, so results are
//! cached under the SHA-256 of the input. Re-rendering the same analysis
//! then costs one hash instead of a full re-parse.

use super::fields::{parse_fields, LabeledField};
use super::sections::{parse_sections, ParsedDocument};
use crate::config::Settings;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Default number of entries kept per cache.
pub const DEFAULT_CAPACITY: usize = 256;

/// Hex SHA-256 of `content`, prefixed like `sha256:ab12…`.
pub fn content_hash(content: &str) -> String {
    format!("sha256:{:x}", Sha256::digest(content.as_bytes()))
}

/// Thread-safe caches for parsed sections and parsed description fields.
pub struct ParseCache {
    capacity: usize,
    sections: Mutex<HashMap<String, Arc<ParsedDocument>>>,
    fields: Mutex<HashMap<String, Arc<Vec<LabeledField>>>>,
}

impl ParseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sections: Mutex::new(HashMap::new()),
            fields: Mutex::new(HashMap::new()),
        }
    }

    /// Cache bounded by `settings.cache_capacity`.
    pub fn from_settings(settings: &Settings) -> Self {
        log::debug!("[CACHE] Capacity {} per cache", settings.cache_capacity);
        Self::new(settings.cache_capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Parsed sections for `textual`, computed at most once per distinct input.
    pub fn sections(&self, textual: &str) -> Arc<ParsedDocument> {
        memoize(&self.sections, self.capacity, textual, parse_sections)
    }

    /// Parsed fields for an annotation `description`.
    pub fn fields(&self, description: &str) -> Arc<Vec<LabeledField>> {
        memoize(&self.fields, self.capacity, description, parse_fields)
    }

    /// Forget cached results for `content` in both caches.
    pub fn invalidate(&self, content: &str) {
        let key = content_hash(content);
        lock(&self.sections).remove(&key);
        lock(&self.fields).remove(&key);
    }

    pub fn clear(&self) {
        lock(&self.sections).clear();
        lock(&self.fields).clear();
    }

    /// Total entries across both caches.
    pub fn len(&self) -> usize {
        lock(&self.sections).len() + lock(&self.fields).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// A poisoned lock only means another thread panicked mid-insert; the map
/// itself is still usable.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn memoize<T>(
    map: &Mutex<HashMap<String, Arc<T>>>,
    capacity: usize,
    input: &str,
    parse: fn(&str) -> T,
) -> Arc<T> {
    let key = content_hash(input);
    if let Some(hit) = lock(map).get(&key) {
        return Arc::clone(hit);
    }

    // Parse outside the lock; a concurrent miss on the same key just parses twice.
    let value = Arc::new(parse(input));

    let mut guard = lock(map);
    if guard.len() >= capacity {
        log::debug!("[CACHE] Capacity {} reached, clearing", capacity);
        guard.clear();
    }
    guard.insert(key, Arc::clone(&value));
    value
}
