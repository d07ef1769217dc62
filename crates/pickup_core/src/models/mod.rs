pub mod participant;
pub mod quotas;
pub mod roster;
pub mod team;

pub use participant::{AnchorageId, Participant, Position, TeamId};
pub use quotas::{PositionCounts, PositionQuotas};
pub use roster::{Roster, RosterEntry, Slot};
pub use team::Team;
