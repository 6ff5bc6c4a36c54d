use super::types::RegionId;
use thiserror::Error;

/// Why a finished draw did not become a region
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommitError {
    /// Fewer than three distinct vertices, or a circle with no radius. Dropped silently.
    #[error("shape has {points} usable point(s); at least 3 are required")]
    Degenerate { points: usize },
    /// Shown to the user as a blocking notice.
    #[error("New Region of Interest overlaps an existing one. Discarding it.")]
    Overlap { existing: RegionId },
}

impl CommitError {
    /// Whether the rejection must be surfaced to the participant
    pub fn is_user_visible(&self) -> bool {
        matches!(self, CommitError::Overlap { .. })
    }
}
