use std::path::PathBuf;

use thiserror::Error;

use crate::identity::EntityKind;

/// Errors surfaced by resolution, extraction, and routine loading.
///
/// Missing fields on a detail page are never errors: extraction leaves the
/// corresponding record field unset.
#[derive(Error, Debug)]
pub enum Error {
    /// A search returned no rows and the no-results handler gave up.
    #[error("no {kind} search results for \"{query}\"")]
    NoSearchResults { kind: EntityKind, query: String },

    /// An address does not have the shape of a detail page for `kind`.
    #[error("not a detail address for {kind}: {address}")]
    MalformedAddress { address: String, kind: EntityKind },

    /// Network or HTTP-level failure. Never retried by the library.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("failed to load name lookup {}: {message}", path.display())]
    Lookup { path: PathBuf, message: String },

    #[error("failed to load routine {}: {message}", path.display())]
    RoutineFile { path: PathBuf, message: String },
}

impl Error {
    /// Whether the failure only means "not resolvable yet" for one entity.
    ///
    /// Batch operations log these and move on; anything else aborts the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoSearchResults { .. } | Self::MalformedAddress { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
