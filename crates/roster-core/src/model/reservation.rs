//! Aircraft reservations. Read-only from the client's perspective.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i32,
    pub plane: Aircraft,
    pub reserved_by: String,
    pub created_at: NaiveDateTime,
    pub period: Period,
    #[serde(default)]
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub registration_number: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_number: Option<String>,
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.competition_number {
            Some(number) => write!(f, "{} {} - {}", self.registration_number, self.model, number),
            None => write!(f, "{} {}", self.registration_number, self.model),
        }
    }
}

/// Reserved time span, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl Period {
    /// Returns true if any part of the period falls on `date`.
    pub fn overlaps(&self, date: &NaiveDate) -> bool {
        self.from.date() <= *date && *date <= self.to.date()
    }
}
