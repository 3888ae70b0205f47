//! Navigation routes of the client.

use chrono::NaiveDate;
use std::fmt;

const PATH_ROOT: &str = "/";
const PATH_LOGIN: &str = "/login";
const PATH_CALENDAR: &str = "/reservation/calendar";
const PATH_DAY_PREFIX: &str = "/reservation/day/";
const PATH_CHECKLIST: &str = "/reservation/checklist";
const PATH_SETTINGS: &str = "/settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`, which always forwards to the calendar.
    Root,
    Login,
    Calendar,
    Day(NaiveDate),
    Checklist,
    Settings,
}

impl Route {
    /// Parses a path into a route. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        // "/settings/" and "/settings" are the same route
        let trimmed = match path.trim_end_matches('/') {
            "" => PATH_ROOT,
            other => other,
        };
        match trimmed {
            PATH_ROOT => Some(Self::Root),
            PATH_LOGIN => Some(Self::Login),
            PATH_CALENDAR => Some(Self::Calendar),
            PATH_CHECKLIST => Some(Self::Checklist),
            PATH_SETTINGS => Some(Self::Settings),
            other => other
                .strip_prefix(PATH_DAY_PREFIX)
                .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
                .map(Self::Day),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Root => PATH_ROOT.to_string(),
            Self::Login => PATH_LOGIN.to_string(),
            Self::Calendar => PATH_CALENDAR.to_string(),
            Self::Day(date) => format!("{}{}", PATH_DAY_PREFIX, date.format("%Y-%m-%d")),
            Self::Checklist => PATH_CHECKLIST.to_string(),
            Self::Settings => PATH_SETTINGS.to_string(),
        }
    }

    pub fn is_login(&self) -> bool {
        matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
