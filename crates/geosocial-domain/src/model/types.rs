//! Core type definitions for the social graph.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A user identifier (a vertex of the social graph).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, rejecting empty or blank values.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier { value });
        }
        Ok(Self(value))
    }

    /// Returns the user identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A keyword identifier (interest, check-in category, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeywordId(String);

impl KeywordId {
    /// Creates a new KeywordId, rejecting empty or blank values.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier { value });
        }
        Ok(Self(value))
    }

    /// Returns the keyword as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KeywordId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KeywordId> for String {
    fn from(value: KeywordId) -> Self {
        value.0
    }
}

impl fmt::Display for KeywordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keywords attached to one user.
pub type KeywordSet = BTreeSet<KeywordId>;

/// A weighted edge between two users.
///
/// The weight is an interaction strength or a travel distance depending on
/// the query mode; it is always finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRelationship")]
pub struct Relationship {
    pub from: UserId,
    pub to: UserId,
    pub weight: f64,
}

impl Relationship {
    /// Creates a new Relationship, validating the weight.
    pub fn new(from: UserId, to: UserId, weight: f64) -> DomainResult<Self> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(DomainError::invalid_parameter(
                "weight",
                format!("must be a finite non-negative number, got {weight}"),
            ));
        }
        Ok(Self { from, to, weight })
    }
}

#[derive(Deserialize)]
struct RawRelationship {
    from: UserId,
    to: UserId,
    weight: f64,
}

impl TryFrom<RawRelationship> for Relationship {
    type Error = DomainError;

    fn try_from(raw: RawRelationship) -> Result<Self, Self::Error> {
        Self::new(raw.from, raw.to, raw.weight)
    }
}

/// Closed time interval `[start, end]` during which a keyword applies to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Creates a new TimeWindow. Fails when `start > end`.
    pub fn new(start: i64, end: i64) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::invalid_parameter(
                "time_window",
                format!("start {start} is after end {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Length of the window. Spans the whole `i64` range without overflow.
    pub fn len(&self) -> u64 {
        self.end.abs_diff(self.start)
    }

    /// Returns true for a single-instant window.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Length of the intersection with `other`, or `None` when disjoint.
    pub fn overlap(&self, other: &TimeWindow) -> Option<u64> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then(|| end.abs_diff(start))
    }
}

#[derive(Deserialize)]
struct RawTimeWindow {
    start: i64,
    end: i64,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = DomainError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// Geographic position of a user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Creates a new Location, validating coordinate ranges.
    pub fn new(lat: f64, lon: f64) -> DomainResult<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::invalid_parameter(
                "lat",
                format!("must be within [-90, 90], got {lat}"),
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::invalid_parameter(
                "lon",
                format!("must be within [-180, 180], got {lon}"),
            ));
        }
        Ok(Self { lat, lon })
    }
}

#[derive(Deserialize)]
struct RawLocation {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = DomainError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}
