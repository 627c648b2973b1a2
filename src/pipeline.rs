use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

/// Where an application sits on the board. Any status can follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Wishlist,
    Applied,
    Interview,
    Rejected,
    Accepted,
    Offered,
}

impl ApplicationStatus {
    /// Column order of the kanban board.
    pub const ALL: [ApplicationStatus; 6] = [
        Self::Wishlist,
        Self::Applied,
        Self::Interview,
        Self::Rejected,
        Self::Accepted,
        Self::Offered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wishlist => "wishlist",
            Self::Applied => "applied",
            Self::Interview => "interview",
            Self::Rejected => "rejected",
            Self::Accepted => "accepted",
            Self::Offered => "offered",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wishlist => "Wishlist",
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Rejected => "Rejected",
            Self::Accepted => "Accepted",
            Self::Offered => "Offered",
        }
    }

    /// The milestone stamped whenever an application enters this status.
    pub fn milestone(self) -> Option<Milestone> {
        match self {
            Self::Applied => Some(Milestone::Applied),
            Self::Interview => Some(Milestone::Interviewed),
            Self::Offered => Some(Milestone::Offered),
            Self::Rejected => Some(Milestone::Rejected),
            Self::Wishlist | Self::Accepted => None,
        }
    }

    /// Rejected and accepted applications no longer need follow-up.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Rejected | Self::Accepted)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| PipelineError::InvalidStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Applied,
    Interviewed,
    Offered,
    Rejected,
}

/// Progress markers of an application. A slot stays `None` until its status is
/// reached and is never cleared afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestones {
    pub applied_at: Option<OffsetDateTime>,
    pub interviewed_at: Option<OffsetDateTime>,
    pub offered_at: Option<OffsetDateTime>,
    pub rejected_at: Option<OffsetDateTime>,
}

impl Milestones {
    pub fn get(&self, milestone: Milestone) -> Option<OffsetDateTime> {
        match milestone {
            Milestone::Applied => self.applied_at,
            Milestone::Interviewed => self.interviewed_at,
            Milestone::Offered => self.offered_at,
            Milestone::Rejected => self.rejected_at,
        }
    }

    fn slot_mut(&mut self, milestone: Milestone) -> &mut Option<OffsetDateTime> {
        match milestone {
            Milestone::Applied => &mut self.applied_at,
            Milestone::Interviewed => &mut self.interviewed_at,
            Milestone::Offered => &mut self.offered_at,
            Milestone::Rejected => &mut self.rejected_at,
        }
    }

    /// Stamps `now` into the slot mapped to `status`, overwriting an earlier
    /// stamp of the same slot. Returns the stamped milestone, if any.
    pub fn record(&mut self, status: ApplicationStatus, now: OffsetDateTime) -> Option<Milestone> {
        let milestone = status.milestone()?;
        *self.slot_mut(milestone) = Some(now);
        Some(milestone)
    }

    /// Most recent of the recorded stamps.
    pub fn latest(&self) -> Option<OffsetDateTime> {
        [
            self.applied_at,
            self.interviewed_at,
            self.offered_at,
            self.rejected_at,
        ]
        .into_iter()
        .flatten()
        .max()
    }
}
