use crate::anchorage::RejectionReason;
use crate::distribution::DistributionError;
use crate::models::Position;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Quota for {position} must be even, found {quota}")]
    OddQuota { position: Position, quota: usize },

    #[error("Player pool is empty: every position quota is zero")]
    EmptyPool,

    #[error("Invalid anchorage limits: {0}")]
    InvalidLimits(String),

    #[error("Invalid skill range: {min}..={max}")]
    InvalidSkillRange { min: u8, max: u8 },

    #[error("Name length limit must be positive")]
    InvalidNameLimit,

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed config {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Player name cannot be blank")]
    BlankName,

    #[error("Player name '{name}' exceeds {max} characters")]
    NameTooLong { name: String, max: usize },

    #[error("Player name '{0}' is repeated")]
    DuplicateName(String),

    #[error("Skill {skill} of '{name}' is outside {min}..={max}")]
    SkillOutOfRange { name: String, skill: u8, min: u8, max: u8 },

    #[error("Unknown player '{0}'")]
    UnknownParticipant(String),

    #[error("Roster has {found} {position} players, quota is {expected}")]
    QuotaMismatch { position: Position, expected: usize, found: usize },

    #[error("Anchorage ids on the roster are not contiguous from 1: {0}")]
    SparseAnchorages(String),
}

/// Umbrella error for callers that drive the whole flow.
#[derive(Error, Debug)]
pub enum PickupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("Anchorage rejected: {0}")]
    Rejected(#[from] RejectionReason),

    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

impl PickupError {
    /// Whether the user can fix the input and try again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PickupError::Config(_) => false,
            PickupError::Roster(_) => true,
            PickupError::Rejected(reason) => reason.is_recoverable(),
            PickupError::Distribution(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PickupError>;
