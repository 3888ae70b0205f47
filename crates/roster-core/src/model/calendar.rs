//! Calendar overview models.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::reservation::Reservation;

/// Read-only aggregate summary of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOverview {
    pub date: NaiveDate,
    pub registered_pilots: Stats,
    pub entries: Vec<PersonEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

/// Participation counts of a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub definitive: u32,
    pub tentative: u32,
}

impl From<(u32, u32)> for Stats {
    fn from((definitive, tentative): (u32, u32)) -> Self {
        Self {
            definitive,
            tentative,
        }
    }
}

/// A staff member on duty (instructor, tow pilot, winch operator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonEntry {
    pub time_frame: TimeFrame,
    pub name: String,
    pub entry_type: EntryType,
    #[serde(rename = "note1", default, skip_serializing_if = "Option::is_none")]
    pub note_1: Option<String>,
    #[serde(rename = "note2", default, skip_serializing_if = "Option::is_none")]
    pub note_2: Option<String>,
}

pub type TimeFrame = (NaiveTime, NaiveTime);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    FlightInstructor,
    TowingPilot,
    WinchOperator,
}
