//! Aggregated output documents
//!
//! A [`GrandPrixDocument`] bundles one meeting with at most one
//! [`SessionDocument`] per [`SessionKind`]. The session map is a fixed record,
//! so a session whose name is not recognized can never create a key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::{
    Driver, Lap, Meeting, PitStop, RaceControlMessage, Session, SessionResult, StartingGridSlot,
    Stint,
};

/// Session slots of a Grand Prix document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// First free practice
    Practice1,
    /// Second free practice
    Practice2,
    /// Third free practice
    Practice3,
    /// Qualifying
    Qualifying,
    /// Sprint race
    Sprint,
    /// Grand Prix race
    Race,
}

impl SessionKind {
    /// Every kind, in weekend order
    pub const ALL: [SessionKind; 6] = [
        SessionKind::Practice1,
        SessionKind::Practice2,
        SessionKind::Practice3,
        SessionKind::Qualifying,
        SessionKind::Sprint,
        SessionKind::Race,
    ];

    /// Map a free-text session name onto a kind
    ///
    /// Returns `None` for names outside the fixed set (e.g., "Sprint Qualifying").
    pub fn from_session_name(name: &str) -> Option<Self> {
        match normalize_session_name(name).as_str() {
            "practice1" => Some(SessionKind::Practice1),
            "practice2" => Some(SessionKind::Practice2),
            "practice3" => Some(SessionKind::Practice3),
            "qualifying" => Some(SessionKind::Qualifying),
            "sprint" => Some(SessionKind::Sprint),
            "race" => Some(SessionKind::Race),
            _ => None,
        }
    }

    /// Document key for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "practice1",
            SessionKind::Practice2 => "practice2",
            SessionKind::Practice3 => "practice3",
            SessionKind::Qualifying => "qualifying",
            SessionKind::Sprint => "sprint",
            SessionKind::Race => "race",
        }
    }

    /// Session name as OpenF1 spells it (e.g., "Practice 1")
    pub fn upstream_name(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "Practice 1",
            SessionKind::Practice2 => "Practice 2",
            SessionKind::Practice3 => "Practice 3",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Sprint => "Sprint",
            SessionKind::Race => "Race",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase a session name and keep only ASCII letters and digits
///
/// `"Practice 1"` becomes `"practice1"`.
pub fn normalize_session_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// One session with its participants, results and the requested extras
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionDocument {
    /// Session metadata
    pub session: Session,
    /// Drivers entered in the session
    pub drivers: Vec<Driver>,
    /// Final classification
    pub results: Vec<SessionResult>,
    /// Lap timing, when requested and fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laps: Option<Vec<Lap>>,
    /// Tyre stints, when requested and fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stints: Option<Vec<Stint>>,
    /// Pit stops, when requested and fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pits: Option<Vec<PitStop>>,
    /// Race control messages, when requested and fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_control: Option<Vec<RaceControlMessage>>,
    /// Starting grid, for race-type sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_grid: Option<Vec<StartingGridSlot>>,
}

impl SessionDocument {
    /// Document holding only the mandatory parts
    pub fn new(session: Session, drivers: Vec<Driver>, results: Vec<SessionResult>) -> Self {
        Self {
            session,
            drivers,
            results,
            laps: None,
            stints: None,
            pits: None,
            race_control: None,
            starting_grid: None,
        }
    }

    /// Check uniqueness of driver numbers and classified positions
    ///
    /// Returns one message per violation; an empty list means the document is consistent.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut seen = HashSet::new();
        for driver in &self.drivers {
            if !seen.insert(driver.driver_number) {
                problems.push(format!("duplicate driver number {} in drivers", driver.driver_number));
            }
        }

        let mut seen = HashSet::new();
        for result in &self.results {
            if !seen.insert(result.driver_number) {
                problems.push(format!("duplicate driver number {} in results", result.driver_number));
            }
        }

        let mut seen = HashSet::new();
        for position in self
            .results
            .iter()
            .filter(|r| r.is_classified())
            .filter_map(|r| r.position)
        {
            if !seen.insert(position) {
                problems.push(format!("duplicate classified position {position}"));
            }
        }

        problems
    }
}

/// Fixed set of session slots
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionMap {
    /// First free practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice1: Option<SessionDocument>,
    /// Second free practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice2: Option<SessionDocument>,
    /// Third free practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice3: Option<SessionDocument>,
    /// Qualifying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifying: Option<SessionDocument>,
    /// Sprint race
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<SessionDocument>,
    /// Grand Prix race
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<SessionDocument>,
}

impl SessionMap {
    fn slot_mut(&mut self, kind: SessionKind) -> &mut Option<SessionDocument> {
        match kind {
            SessionKind::Practice1 => &mut self.practice1,
            SessionKind::Practice2 => &mut self.practice2,
            SessionKind::Practice3 => &mut self.practice3,
            SessionKind::Qualifying => &mut self.qualifying,
            SessionKind::Sprint => &mut self.sprint,
            SessionKind::Race => &mut self.race,
        }
    }

    /// Store a session, returning the one it replaced
    pub fn insert(&mut self, kind: SessionKind, document: SessionDocument) -> Option<SessionDocument> {
        self.slot_mut(kind).replace(document)
    }

    /// Session stored under `kind`
    pub fn get(&self, kind: SessionKind) -> Option<&SessionDocument> {
        match kind {
            SessionKind::Practice1 => self.practice1.as_ref(),
            SessionKind::Practice2 => self.practice2.as_ref(),
            SessionKind::Practice3 => self.practice3.as_ref(),
            SessionKind::Qualifying => self.qualifying.as_ref(),
            SessionKind::Sprint => self.sprint.as_ref(),
            SessionKind::Race => self.race.as_ref(),
        }
    }

    /// Kinds that hold a session, in weekend order
    pub fn keys(&self) -> Vec<SessionKind> {
        SessionKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .collect()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Whether no session is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provenance of a Grand Prix document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    /// When the document was assembled
    pub scraped_at: DateTime<Utc>,
    /// Season year
    pub season: i32,
    /// Round number, derived from the meeting key (best effort)
    pub round: u32,
}

/// One meeting and its recognized sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrandPrixDocument {
    /// Meeting metadata
    pub meeting: Meeting,
    /// Session slots
    pub sessions: SessionMap,
    /// Provenance
    pub metadata: DocumentMetadata,
}

impl GrandPrixDocument {
    /// Assemble a document stamped with the current time
    pub fn new(meeting: Meeting, sessions: SessionMap) -> Self {
        let metadata = DocumentMetadata {
            scraped_at: Utc::now(),
            season: meeting.year,
            round: round_from_meeting_key(meeting.meeting_key),
        };
        Self {
            meeting,
            sessions,
            metadata,
        }
    }
}

/// Round number approximation
///
/// OpenF1 meeting keys are not round numbers; `meeting_key % 100` is only a
/// heuristic and must not be relied on for ordering.
pub fn round_from_meeting_key(meeting_key: u32) -> u32 {
    meeting_key % 100
}
