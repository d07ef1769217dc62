//! Pickup CLI Library
//!
//! Roster file loading, logging setup and the split runner behind the
//! `pickup` binary.

pub mod logging;
pub mod roster_file;
pub mod run;

pub use roster_file::RosterFile;
pub use run::{load_config, run_split, Rejection, SplitOptions, SplitOutcome};
