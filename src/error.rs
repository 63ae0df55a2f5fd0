//! Engine facade errors.

use thiserror::Error;

/// Errors raised while configuring an engine by numeric property id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The id does not name an engine property.
    #[error("unknown engine property id {0}")]
    UnknownProperty(u32),
}
