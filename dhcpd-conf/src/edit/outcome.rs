use thiserror::Error;

use crate::record::{RecordError, Reservation};

/// Why a single record could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Hostname, MAC or IP failed validation.
    #[error(transparent)]
    InvalidRecord(#[from] RecordError),
    /// MAC is bound to another host and conflicts may not be resolved.
    #[error("conflict: MAC {mac} is already used by {existing}; run interactively to resolve")]
    Conflict { mac: String, existing: Reservation },
    /// The conflicting block could not be removed.
    #[error("failed to remove conflicting reservation for {host}")]
    ConflictUnresolved { host: String },
}

/// Terminal state of one record in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Reservation already present as requested.
    Unchanged,
    /// New block appended.
    Added,
    /// Existing block for the host rewritten.
    Updated {
        /// Unrecognized statements carried over from the old block.
        preserved_directives: usize,
    },
    /// Block deleted.
    Removed,
    /// Nothing to remove.
    NotFound,
    /// Conflict resolution was declined.
    Skipped { reason: String },
    /// Record rejected.
    Failed(EditError),
}

impl Outcome {
    /// `true` unless the record was skipped or failed.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Skipped { .. } | Self::Failed(_))
    }

    /// `true` when the configuration text was modified.
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Added | Self::Updated { .. } | Self::Removed)
    }

    /// Short lowercase label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Added => "added",
            Self::Updated { .. } => "updated",
            Self::Removed => "removed",
            Self::NotFound => "not-found",
            Self::Skipped { .. } => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_and_failed_are_not_successes() {
        assert!(Outcome::Unchanged.is_success());
        assert!(Outcome::NotFound.is_success());
        assert!(!Outcome::Skipped {
            reason: "user declined".to_string()
        }
        .is_success());
        assert!(!Outcome::Failed(EditError::ConflictUnresolved {
            host: "a".to_string()
        })
        .is_success());
        assert!(!Outcome::NotFound.is_changed());
        assert!(Outcome::Updated {
            preserved_directives: 0
        }
        .is_changed());
    }
}
