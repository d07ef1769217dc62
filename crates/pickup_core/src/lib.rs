//! # pickup_core - Two-Team Split Engine for Pickup Matches
//!
//! Splits a pool of players into two teams that mirror each other position
//! by position, while honouring anchorages (groups of players who must end
//! up on the same team).
//!
//! ## Features
//! - Anchorage session with typed rejections and dense ids
//! - Random and skill-balanced distribution strategies
//! - Seeded randomness (same seed = same teams)
//! - JSON-configurable squad presets and serialisable split reports

pub mod anchorage;
pub mod config;
pub mod distribution;
pub mod error;
pub mod models;

#[cfg(test)]
mod testing;

// Re-export the anchoring phase
pub use anchorage::{
    begin_anchoring, AnchorageLimits, AnchoragePlan, AnchorageSession, AnchorageSummary,
    RejectionReason,
};

// Re-export the distribution engine
pub use distribution::{
    distribute, reset_assignments, verify_split, DistributionError, Distributor, SplitReport,
    Strategy,
};

pub use config::SquadConfig;
pub use error::{ConfigError, PickupError, Result, RosterError};
pub use models::{
    AnchorageId, Participant, Position, PositionQuotas, Roster, RosterEntry, Team, TeamId,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
