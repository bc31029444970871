//! Errors reported by the workspace.

use thiserror::Error;

/// Misuse of a workspace slot that is detected and reported instead of
/// being silently reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// A slot was requested as a different type than it was created with.
    #[error("workspace slot `{name}` holds `{stored}`, requested as `{requested}`")]
    TypeMismatch {
        /// Name the slot was requested under.
        name: String,
        /// Type the slot was constructed as.
        stored: &'static str,
        /// Type the caller asked for.
        requested: &'static str,
    },
}

impl WorkspaceError {
    pub(crate) fn type_mismatch(
        name: &str,
        stored: &'static str,
        requested: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            name: name.to_owned(),
            stored,
            requested,
        }
    }
}

/// Result alias for workspace lookups.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
