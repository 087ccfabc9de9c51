//! Mentee onboarding status lifecycle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Onboarding state of a mentee.
///
/// An unconstrained enumeration, not a guarded state machine: any caller
/// authorized to mutate a mentee may set any status. Creation always
/// starts at [`MenteeStatus::Assigned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenteeStatus {
    /// A buddy has been assigned but has not reached out yet.
    #[default]
    Assigned,
    /// The buddy has sent a first message.
    Contacted,
    /// The mentee replied; the pair is in regular contact.
    InTouch,
    /// The mentee has arrived at the host institution.
    Arrived,
    /// The pair has met in person.
    Met,
    /// The mentee declined the buddy program.
    Rejected,
    /// The mentee stopped responding.
    Unresponsive,
    /// Onboarding is complete.
    Served,
}

impl MenteeStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [MenteeStatus; 8] = [
        MenteeStatus::Assigned,
        MenteeStatus::Contacted,
        MenteeStatus::InTouch,
        MenteeStatus::Arrived,
        MenteeStatus::Met,
        MenteeStatus::Rejected,
        MenteeStatus::Unresponsive,
        MenteeStatus::Served,
    ];

    /// Returns the snake_case wire form of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Contacted => "contacted",
            Self::InTouch => "in_touch",
            Self::Arrived => "arrived",
            Self::Met => "met",
            Self::Rejected => "rejected",
            Self::Unresponsive => "unresponsive",
            Self::Served => "served",
        }
    }
}

impl fmt::Display for MenteeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenteeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(Self::Assigned),
            "contacted" => Ok(Self::Contacted),
            "in_touch" => Ok(Self::InTouch),
            "arrived" => Ok(Self::Arrived),
            "met" => Ok(Self::Met),
            "rejected" => Ok(Self::Rejected),
            "unresponsive" => Ok(Self::Unresponsive),
            "served" => Ok(Self::Served),
            other => Err(format!("unknown mentee status: {other}")),
        }
    }
}
