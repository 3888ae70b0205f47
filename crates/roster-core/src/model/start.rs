//! Flight start list kept on the client during a flying day.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, RosterError};

/// One recorded take-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Start {
    pub from: NaiveTime,
    pub to: NaiveTime,
    /// Pilot in command.
    pub pic: String,
    #[serde(default)]
    pub copilot: String,
    #[serde(default)]
    pub is_pax: bool,
    pub plane: String,
    /// When the start was added to the list.
    pub updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

/// A start form being filled in, possibly incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveTime>,
    #[serde(default)]
    pub pic: String,
    #[serde(default)]
    pub copilot: String,
    #[serde(default)]
    pub is_pax: bool,
    #[serde(default)]
    pub plane: String,
}

impl StartDraft {
    /// Turns a complete draft into a start stamped with `updated`.
    ///
    /// Times, pilot in command and plane are required, and the landing may
    /// not precede the take-off.
    pub fn complete(self, updated: DateTime<Utc>) -> Result<Start> {
        let from = self
            .from
            .ok_or_else(|| RosterError::validation("start time is missing"))?;
        let to = self
            .to
            .ok_or_else(|| RosterError::validation("landing time is missing"))?;
        if to < from {
            return Err(RosterError::validation(format!(
                "landing {} is before take-off {}",
                to, from
            )));
        }
        if self.pic.trim().is_empty() {
            return Err(RosterError::validation("pilot in command is missing"));
        }
        if self.plane.trim().is_empty() {
            return Err(RosterError::validation("plane is missing"));
        }

        Ok(Start {
            from,
            to,
            pic: self.pic,
            copilot: self.copilot,
            is_pax: self.is_pax,
            plane: self.plane,
            updated,
            id: None,
        })
    }
}

/// One of the two draft slots of the start form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FormSlot {
    A,
    B,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartForms {
    #[serde(default)]
    pub a: StartDraft,
    #[serde(default)]
    pub b: StartDraft,
}

impl StartForms {
    pub fn get(&self, slot: FormSlot) -> &StartDraft {
        match slot {
            FormSlot::A => &self.a,
            FormSlot::B => &self.b,
        }
    }

    pub fn get_mut(&mut self, slot: FormSlot) -> &mut StartDraft {
        match slot {
            FormSlot::A => &mut self.a,
            FormSlot::B => &mut self.b,
        }
    }
}

/// Everything the start list persists: recorded starts, open drafts and
/// the suggestion lists offered by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartList {
    #[serde(default)]
    pub pax: Vec<String>,
    #[serde(default)]
    pub planes: Vec<String>,
    #[serde(default)]
    pub pilots: Vec<String>,
    #[serde(default)]
    pub list: Vec<Start>,
    #[serde(default)]
    pub forms: StartForms,
}
