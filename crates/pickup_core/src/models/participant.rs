use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field position of a participant.
///
/// The set is closed: every quota table and every team carries exactly one
/// bucket per variant, in declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Goalkeeper,
    CentralDefender,
    LateralDefender,
    Midfielder,
    Forward,
}

impl Position {
    pub const COUNT: usize = 5;

    pub const ALL: [Position; Position::COUNT] = [
        Position::Goalkeeper,
        Position::CentralDefender,
        Position::LateralDefender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Short code used in tables and roster files (e.g. "GK").
    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::CentralDefender => "CD",
            Position::LateralDefender => "LD",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeepers",
            Position::CentralDefender => "Central defenders",
            Position::LateralDefender => "Lateral defenders",
            Position::Midfielder => "Midfielders",
            Position::Forward => "Forwards",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "GK" | "GOALKEEPER" => Ok(Position::Goalkeeper),
            "CD" | "CB" | "CENTRAL_DEFENDER" => Ok(Position::CentralDefender),
            "LD" | "LB" | "RB" | "LATERAL_DEFENDER" => Ok(Position::LateralDefender),
            "MF" | "MID" | "MIDFIELDER" => Ok(Position::Midfielder),
            "FW" | "FWD" | "FORWARD" => Ok(Position::Forward),
            _ => Err(format!("Invalid position: {}", s)),
        }
    }
}

/// One of the two destination teams.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TeamId {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl TeamId {
    pub const BOTH: [TeamId; 2] = [TeamId::One, TeamId::Two];

    pub fn number(&self) -> u8 {
        match self {
            TeamId::One => 1,
            TeamId::Two => 2,
        }
    }

    pub fn other(&self) -> TeamId {
        match self {
            TeamId::One => TeamId::Two,
            TeamId::Two => TeamId::One,
        }
    }

    /// Slot of this team inside a `[Team; 2]` pair.
    pub fn index(&self) -> usize {
        self.number() as usize - 1
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team {}", self.number())
    }
}

/// Ordinal of an anchorage, always in `1..=anchorage_count`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AnchorageId(u32);

impl AnchorageId {
    /// Returns `None` for 0, which is never a valid anchorage.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(AnchorageId(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub(crate) fn first() -> Self {
        AnchorageId(1)
    }

    pub(crate) fn next(&self) -> Self {
        AnchorageId(self.0 + 1)
    }

    /// Id one below this one; `None` when this is the first anchorage.
    pub(crate) fn prev(&self) -> Option<Self> {
        AnchorageId::new(self.0 - 1)
    }
}

impl fmt::Display for AnchorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A player in the pool.
///
/// Name and position are fixed once the roster is built. Skill, team and
/// anchorage are mutated by the rating step, the distribution engine and the
/// anchorage session respectively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    name: String,
    position: Position,
    pub skill: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchorage: Option<AnchorageId>,
}

impl Participant {
    pub fn new(name: impl Into<String>, position: Position, skill: u8) -> Self {
        Self { name: name.into(), position, skill, team: None, anchorage: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_anchored(&self) -> bool {
        self.anchorage.is_some()
    }

    pub fn is_assigned(&self) -> bool {
        self.team.is_some()
    }
}
