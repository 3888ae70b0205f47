//! The editable roster record of a single calendar date.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::reservation::Reservation;

/// Full editable record of one date's participation entries and the caller's
/// own status.
///
/// A `RosterDay` is only meaningful for the date it was fetched with. Local
/// edits do not update the aggregate counts of the calendar; a refetch does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterDay {
    pub entries: Vec<RosterEntry>,
    pub action: EditAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub participant_type: ParticipantType,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<RosterEntryType>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl RosterDay {
    /// Applies the caller's own status to the local copy.
    pub fn apply_edit(&mut self, entry_type: RosterEntryType, remarks: Option<String>) {
        self.entry_type = Some(entry_type);
        self.remarks = remarks;
    }

    /// Counts entries of the given type.
    pub fn count(&self, entry_type: RosterEntryType) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.entry_type == entry_type)
            .count()
    }
}

/// Whether the caller adds a new entry or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Add,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantType {
    #[serde(rename = "participant_sf")]
    GliderPilot,
}

/// One participant of a roster day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub name: String,
    pub message: String,
    pub entry_type: RosterEntryType,
}

/// Availability a member registers for a day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(ascii_case_insensitive)]
pub enum RosterEntryType {
    Definite,
    Tentative,
    Unavailable,
}
