//! Player core error types.

/// Initialization failures. A component that fails to initialize is left
/// inert instead of aborting the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    /// A reference the component cannot run without was not provided.
    #[error("{component}: missing required reference `{reference}`")]
    MissingReference {
        /// Component that failed to initialize.
        component: &'static str,
        /// The reference it was missing.
        reference: &'static str,
    },

    /// A configured range is empty (its minimum exceeds its maximum).
    #[error("{component}: invalid range `{setting}`")]
    InvalidRange {
        component: &'static str,
        setting: &'static str,
    },
}

/// Failure to load an authored climb profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The RON text did not describe a [`ClimbProfile`](crate::ClimbProfile).
    #[error("failed to parse climb profile: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// A numeric field is out of range.
    #[error("invalid climb profile: {0}")]
    Invalid(&'static str),
}
