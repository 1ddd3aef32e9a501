use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::types::User;

pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Key for a single user lookup.
pub fn user_key(id: i64) -> String {
    format!("user:{id}")
}

/// Key for an aggregated listing. Includes the start page so listings that
/// begin at different pages never share an entry.
pub fn all_users_key(start_page: u32) -> String {
    format!("users:from:{start_page}")
}

#[derive(Clone, Debug, PartialEq)]
pub enum CachedValue {
    User(User),
    Users(Vec<User>),
}

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub value: CachedValue,
    pub inserted_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

/// In-memory TTL store shared between clients, backed by `DashMap`.
///
/// Cloning yields another handle to the same entries. Expired entries are
/// evicted lazily on access.
#[derive(Clone)]
pub struct ResultCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            default_ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<CachedValue> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<CachedValue> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired_at(now) {
                return Some(entry.value.clone());
            }
            // drop the read guard before removing
            drop(entry);
            // a fresh entry may have been inserted in between
            self.entries.remove_if(key, |_, entry| entry.is_expired_at(now));
        }
        None
    }

    pub fn set(&self, key: impl Into<String>, value: CachedValue, ttl: Duration) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Store with the cache's default TTL.
    pub fn insert(&self, key: impl Into<String>, value: CachedValue) {
        self.set(key, value, self.default_ttl);
    }

    pub fn get_user(&self, id: i64) -> Option<User> {
        match self.get(&user_key(id))? {
            CachedValue::User(user) => Some(user),
            CachedValue::Users(_) => None,
        }
    }

    pub fn get_users(&self, start_page: u32) -> Option<Vec<User>> {
        match self.get(&all_users_key(start_page))? {
            CachedValue::Users(users) => Some(users),
            CachedValue::User(_) => None,
        }
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
