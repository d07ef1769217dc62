//! Roster input file
//!
//! ```json
//! {
//!   "players": [
//!     { "name": "Ana", "position": "GOALKEEPER", "skill": 4 },
//!     { "name": "Beto", "position": "FORWARD" }
//!   ],
//!   "anchorages": [["Ana", "Beto"]]
//! }
//! ```

use anyhow::{Context, Result};
use pickup_core::RosterEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterFile {
    pub players: Vec<RosterEntry>,
    /// Requested anchorages, each a list of player names
    #[serde(default)]
    pub anchorages: Vec<Vec<String>>,
}

impl RosterFile {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed roster file: {}", path.display()))
    }
}
