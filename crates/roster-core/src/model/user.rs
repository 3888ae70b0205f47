//! The authenticated member as returned by `GET /@me`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub settings: UserSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub notifications: NotificationSettings,
}

/// Which roster changes the member wants to be notified about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enabled: bool,
    pub flight_instructors: bool,
    pub potential_flight_instructors: bool,
    pub flight_instructor_requests: bool,
    pub tow_pilots: bool,
    pub potential_tow_pilots: bool,
    pub tow_pilot_requests: bool,
}
