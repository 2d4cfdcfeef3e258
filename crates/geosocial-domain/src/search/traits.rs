//! Graph access needed by the search engine.

use std::sync::Arc;

use crate::error::DomainResult;
use crate::model::{KeywordId, KeywordSet, Location, Relationship, TimeWindow, UserId};

/// Read-only view of the social graph.
///
/// Implementations must be thread-safe (Send + Sync). Lookups for a user the
/// backend does not know must fail with
/// [`DomainError::UserNotFound`](crate::error::DomainError::UserNotFound);
/// the engine treats that as fatal for the running query.
pub trait GraphAccess: Send + Sync {
    /// Outgoing relationships of `user`, in a stable order.
    fn relationships(&self, user: &UserId) -> DomainResult<Vec<Relationship>>;

    /// Keywords attached to `user`.
    fn keywords(&self, user: &UserId) -> DomainResult<KeywordSet>;

    /// Time window of `keyword` for `user`, if one is recorded.
    ///
    /// Only consulted by time-aware queries. Default implementation
    /// records no windows.
    fn keyword_time_window(
        &self,
        _user: &UserId,
        _keyword: &KeywordId,
    ) -> DomainResult<Option<TimeWindow>> {
        Ok(None)
    }

    /// Position of `user`. Never used by the engine itself.
    fn location(&self, _user: &UserId) -> DomainResult<Option<Location>> {
        Ok(None)
    }
}

impl<G: GraphAccess + ?Sized> GraphAccess for Arc<G> {
    fn relationships(&self, user: &UserId) -> DomainResult<Vec<Relationship>> {
        (**self).relationships(user)
    }

    fn keywords(&self, user: &UserId) -> DomainResult<KeywordSet> {
        (**self).keywords(user)
    }

    fn keyword_time_window(
        &self,
        user: &UserId,
        keyword: &KeywordId,
    ) -> DomainResult<Option<TimeWindow>> {
        (**self).keyword_time_window(user, keyword)
    }

    fn location(&self, user: &UserId) -> DomainResult<Option<Location>> {
        (**self).location(user)
    }
}
