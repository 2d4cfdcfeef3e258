//! Mock graph for search testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{DomainError, DomainResult};
use crate::model::{KeywordId, KeywordSet, Relationship, TimeWindow, UserId};
use crate::search::GraphAccess;

#[derive(Debug, Default, Clone)]
struct MockUser {
    keywords: KeywordSet,
    edges: Vec<Relationship>,
    windows: HashMap<KeywordId, TimeWindow>,
}

/// In-memory graph with insertion-ordered edges.
#[derive(Debug, Default)]
pub struct MockGraph {
    users: HashMap<UserId, MockUser>,
    lookups: AtomicUsize,
}

pub fn uid(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn kid(id: &str) -> KeywordId {
    KeywordId::new(id).unwrap()
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, id: &str, keywords: &[&str]) -> Self {
        let entry = self.users.entry(uid(id)).or_default();
        entry.keywords = keywords.iter().map(|k| kid(k)).collect();
        self
    }

    /// Directed edge. Both ends must already exist.
    pub fn edge(mut self, from: &str, to: &str, weight: f64) -> Self {
        let rel = Relationship::new(uid(from), uid(to), weight).unwrap();
        self.users
            .get_mut(&uid(from))
            .expect("edge source must be declared")
            .edges
            .push(rel);
        self
    }

    pub fn undirected(self, a: &str, b: &str, weight: f64) -> Self {
        self.edge(a, b, weight).edge(b, a, weight)
    }

    /// Edge to a user the graph does not know.
    pub fn dangling_edge(mut self, from: &str, to: &str) -> Self {
        let rel = Relationship::new(uid(from), uid(to), 1.0).unwrap();
        self.users.entry(uid(from)).or_default().edges.push(rel);
        self
    }

    pub fn window(mut self, user: &str, keyword: &str, start: i64, end: i64) -> Self {
        self.users
            .get_mut(&uid(user))
            .expect("user must be declared")
            .windows
            .insert(kid(keyword), TimeWindow::new(start, end).unwrap());
        self
    }

    /// Number of keyword/relationship lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    fn get(&self, user: &UserId) -> DomainResult<&MockUser> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.users.get(user).ok_or_else(|| DomainError::UserNotFound {
            user: user.to_string(),
        })
    }
}

impl GraphAccess for MockGraph {
    fn relationships(&self, user: &UserId) -> DomainResult<Vec<Relationship>> {
        Ok(self.get(user)?.edges.clone())
    }

    fn keywords(&self, user: &UserId) -> DomainResult<KeywordSet> {
        Ok(self.get(user)?.keywords.clone())
    }

    fn keyword_time_window(
        &self,
        user: &UserId,
        keyword: &KeywordId,
    ) -> DomainResult<Option<TimeWindow>> {
        Ok(self.get(user)?.windows.get(keyword).copied())
    }
}
