use thiserror::Error;

use crate::domain::Category;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstuaryError {
    /// Transient transport failure. Page fetches retry these a few times
    /// before surfacing; mutation calls surface them immediately.
    #[error("network failure: {0}")]
    Network(String),

    /// The account lacks the rights for the requested collection. For report
    /// listings this is mapped to an empty page before it ever reaches the
    /// caller; everywhere else it propagates.
    #[error("not authorized")]
    NotAuthorized,

    /// A source's peek failed mid-merge. The global order cannot be trusted
    /// while any source's next timestamp is unknown, so the whole merge
    /// round is abandoned and the child failure is carried along.
    #[error("merge aborted: {category} source failed")]
    StaleMerge {
        category: Category,
        #[source]
        source: Box<EstuaryError>,
    },

    /// The repository's mutation worker is gone (the repository was torn
    /// down while a call was in flight).
    #[error("repository is shut down")]
    Closed,
}

pub type Result<T> = std::result::Result<T, EstuaryError>;
