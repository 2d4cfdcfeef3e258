//! In-memory graph store.
//!
//! Users live in a `DashMap` keyed by id, so the store can be filled and
//! queried from several threads. Each user's relationships keep insertion
//! order, which makes traversal order reproducible.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, instrument};

use geosocial_domain::{
    DomainResult, GraphAccess, KeywordId, KeywordSet, Location, Relationship, TimeWindow, UserId,
};

use crate::error::{StorageError, StorageResult};

/// Stored attributes of one user.
#[derive(Debug, Clone, Default)]
pub(crate) struct UserEntry {
    pub(crate) keywords: KeywordSet,
    pub(crate) windows: HashMap<KeywordId, TimeWindow>,
    pub(crate) relationships: Vec<Relationship>,
    pub(crate) location: Option<Location>,
}

/// In-memory implementation of [`GraphAccess`].
///
/// # Performance Characteristics
///
/// - **Add user / keyword**: O(1) average (DashMap entry)
/// - **Add relationship**: O(1) amortized (Vec push)
/// - **Lookups**: O(1) map access plus a clone of the returned data
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    users: DashMap<UserId, UserEntry>,
}

impl MemoryGraphStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of directed relationships.
    pub fn relationship_count(&self) -> usize {
        self.users
            .iter()
            .map(|entry| entry.relationships.len())
            .sum()
    }

    pub fn contains_user(&self, user: &UserId) -> bool {
        self.users.contains_key(user)
    }

    /// All user ids, sorted.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Registers a user with its keywords.
    #[instrument(skip_all, fields(user = %user))]
    pub fn add_user(&self, user: UserId, keywords: KeywordSet) -> StorageResult<()> {
        match self.users.entry(user) {
            Entry::Occupied(entry) => Err(StorageError::UserAlreadyExists {
                user: entry.key().to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(UserEntry {
                    keywords,
                    ..UserEntry::default()
                });
                Ok(())
            }
        }
    }

    /// Attaches a keyword to an existing user, optionally with a time window.
    pub fn add_keyword(
        &self,
        user: &UserId,
        keyword: KeywordId,
        window: Option<TimeWindow>,
    ) -> StorageResult<()> {
        let mut entry = self.entry_mut(user)?;
        if let Some(window) = window {
            entry.windows.insert(keyword.clone(), window);
        }
        entry.keywords.insert(keyword);
        Ok(())
    }

    /// Records the time window of a keyword the user already has.
    pub fn set_keyword_window(
        &self,
        user: &UserId,
        keyword: &KeywordId,
        window: TimeWindow,
    ) -> StorageResult<()> {
        let mut entry = self.entry_mut(user)?;
        if !entry.keywords.contains(keyword) {
            return Err(StorageError::KeywordNotFound {
                user: user.to_string(),
                keyword: keyword.to_string(),
            });
        }
        entry.windows.insert(keyword.clone(), window);
        Ok(())
    }

    pub fn set_location(&self, user: &UserId, location: Location) -> StorageResult<()> {
        self.entry_mut(user)?.location = Some(location);
        Ok(())
    }

    /// Adds a directed relationship. Both users must exist.
    pub fn add_relationship(&self, from: &UserId, to: &UserId, weight: f64) -> StorageResult<()> {
        if !self.users.contains_key(to) {
            return Err(StorageError::UserNotFound {
                user: to.to_string(),
            });
        }
        let relationship = Relationship::new(from.clone(), to.clone(), weight)?;
        self.entry_mut(from)?.relationships.push(relationship);
        debug!(from = %from, to = %to, weight, "relationship added");
        Ok(())
    }

    /// Adds the relationship in both directions.
    pub fn add_undirected_relationship(
        &self,
        a: &UserId,
        b: &UserId,
        weight: f64,
    ) -> StorageResult<()> {
        self.add_relationship(a, b, weight)?;
        self.add_relationship(b, a, weight)
    }

    pub(crate) fn entry(&self, user: &UserId) -> StorageResult<UserEntry> {
        self.users
            .get(user)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::UserNotFound {
                user: user.to_string(),
            })
    }

    fn entry_mut(
        &self,
        user: &UserId,
    ) -> StorageResult<dashmap::mapref::one::RefMut<'_, UserId, UserEntry>> {
        self.users
            .get_mut(user)
            .ok_or_else(|| StorageError::UserNotFound {
                user: user.to_string(),
            })
    }

    fn read<T>(&self, user: &UserId, f: impl FnOnce(&UserEntry) -> T) -> StorageResult<T> {
        self.users
            .get(user)
            .map(|entry| f(entry.value()))
            .ok_or_else(|| StorageError::UserNotFound {
                user: user.to_string(),
            })
    }
}

impl GraphAccess for MemoryGraphStore {
    fn relationships(&self, user: &UserId) -> DomainResult<Vec<Relationship>> {
        Ok(self.read(user, |entry| entry.relationships.clone())?)
    }

    fn keywords(&self, user: &UserId) -> DomainResult<KeywordSet> {
        Ok(self.read(user, |entry| entry.keywords.clone())?)
    }

    fn keyword_time_window(
        &self,
        user: &UserId,
        keyword: &KeywordId,
    ) -> DomainResult<Option<TimeWindow>> {
        Ok(self.read(user, |entry| entry.windows.get(keyword).copied())?)
    }

    fn location(&self, user: &UserId) -> DomainResult<Option<Location>> {
        Ok(self.read(user, |entry| entry.location)?)
    }
}
