//! Pause record model and the closed set of pause types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The reason work was suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseType {
    /// Rest break or meal interval.
    Break,
    /// Meeting.
    Reunion,
    /// Alignment session with the team.
    Alignment,
}

impl PauseType {
    /// Label shown in listings, in the same locale as the clock-out note.
    pub fn label(self) -> &'static str {
        match self {
            PauseType::Break => "Intervalo/Descanso",
            PauseType::Reunion => "Reunião",
            PauseType::Alignment => "Alinhamento",
        }
    }
}

impl fmt::Display for PauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Represents an interval nested inside a time record during which work
/// is suspended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// The owning time record.
    pub time_record_id: Uuid,
    /// Why work was suspended.
    pub pause_type: PauseType,
    /// The instant the pause began.
    pub timestamp_start: DateTime<Utc>,
    /// The instant the pause ended; `None` while open.
    #[serde(default)]
    pub timestamp_end: Option<DateTime<Utc>>,
    /// Note recorded when the pause started.
    #[serde(default)]
    pub notes_start: Option<String>,
    /// Note recorded when the pause ended.
    #[serde(default)]
    pub notes_end: Option<String>,
}

impl PauseRecord {
    /// Returns true while the pause has not been ended.
    pub fn is_open(&self) -> bool {
        self.timestamp_end.is_none()
    }
}
