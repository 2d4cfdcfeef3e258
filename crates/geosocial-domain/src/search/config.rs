//! Configuration for community search queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Default upper bound on `max_hops` accepted by the engine.
pub const DEFAULT_MAX_HOPS_LIMIT: u32 = 25;

/// How the visited set restricts revisits during one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitPolicy {
    /// A user is placed at most once in the whole tree.
    #[default]
    Global,
    /// A user may appear on several branches, but never twice on one path.
    PerPath,
}

/// Engine-wide settings shared by every query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Revisit rule for the traversal.
    pub visit_policy: VisitPolicy,
    /// Largest `max_hops` a query may request.
    pub max_hops_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            visit_policy: VisitPolicy::Global,
            max_hops_limit: DEFAULT_MAX_HOPS_LIMIT,
        }
    }
}

impl SearchConfig {
    /// Creates a new configuration with the specified visit policy.
    pub fn with_visit_policy(mut self, visit_policy: VisitPolicy) -> Self {
        self.visit_policy = visit_policy;
        self
    }

    /// Creates a new configuration with the specified hop limit.
    pub fn with_max_hops_limit(mut self, max_hops_limit: u32) -> Self {
        self.max_hops_limit = max_hops_limit;
        self
    }
}

/// Name of a query mode, as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryModeKind {
    Similarity,
    Distance,
}

impl QueryModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Similarity => "similarity",
            Self::Distance => "distance",
        }
    }
}

impl fmt::Display for QueryModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryModeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "similarity" => Ok(Self::Similarity),
            "distance" | "kd-truss" | "kd_truss" => Ok(Self::Distance),
            _ => Err(DomainError::InvalidQueryMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// Mode-specific thresholds of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QueryMode {
    /// Weighted keyword/relationship similarity with a minimum keyword overlap.
    Similarity {
        /// Keyword score weight (`g`).
        keyword_weight: f64,
        /// Relationship score weight (`h`).
        relationship_weight: f64,
        /// Minimum degree of similarity (`η`).
        threshold: f64,
        /// Minimum number of shared keywords (`k`).
        cohesiveness: usize,
    },
    /// Accumulated edge distance with a minimum shared keyword count (kd-truss).
    Distance {
        max_distance: f64,
        required_keywords: usize,
    },
}

impl QueryMode {
    pub fn kind(&self) -> QueryModeKind {
        match self {
            Self::Similarity { .. } => QueryModeKind::Similarity,
            Self::Distance { .. } => QueryModeKind::Distance,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Validated parameters of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Maximum hop depth below the query user.
    pub max_hops: u32,
    /// Mode and its thresholds.
    #[serde(flatten)]
    pub mode: QueryMode,
    /// Minimum fraction of the query user's keyword window that a shared
    /// keyword's window must overlap to count as common.
    #[serde(default)]
    pub time_overlap: Option<f64>,
}

impl QueryParams {
    /// Similarity mode parameters.
    pub fn similarity(
        max_hops: u32,
        keyword_weight: f64,
        relationship_weight: f64,
        threshold: f64,
        cohesiveness: usize,
    ) -> Self {
        Self {
            max_hops,
            mode: QueryMode::Similarity {
                keyword_weight,
                relationship_weight,
                threshold,
                cohesiveness,
            },
            time_overlap: None,
        }
    }

    /// Distance (kd-truss) mode parameters.
    pub fn distance(max_hops: u32, max_distance: f64, required_keywords: usize) -> Self {
        Self {
            max_hops,
            mode: QueryMode::Distance {
                max_distance,
                required_keywords,
            },
            time_overlap: None,
        }
    }

    /// Enables time-aware keyword matching.
    pub fn with_time_overlap(mut self, fraction: f64) -> Self {
        self.time_overlap = Some(fraction);
        self
    }

    /// Checks every threshold before any traversal happens.
    pub fn validate(&self) -> DomainResult<()> {
        match &self.mode {
            QueryMode::Similarity {
                keyword_weight,
                relationship_weight,
                threshold,
                ..
            } => {
                require_finite("keyword_weight", *keyword_weight)?;
                require_finite("relationship_weight", *relationship_weight)?;
                require_non_negative("threshold", *threshold)?;
            }
            QueryMode::Distance { max_distance, .. } => {
                require_non_negative("max_distance", *max_distance)?;
            }
        }

        if let Some(fraction) = self.time_overlap {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(DomainError::invalid_parameter(
                    "time_overlap",
                    format!("must be within [0, 1], got {fraction}"),
                ));
            }
        }

        Ok(())
    }
}

fn require_finite(name: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() {
        return Err(DomainError::invalid_parameter(
            name,
            format!("must be finite, got {value}"),
        ));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> DomainResult<()> {
    require_finite(name, value)?;
    if value < 0.0 {
        return Err(DomainError::invalid_parameter(
            name,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}
