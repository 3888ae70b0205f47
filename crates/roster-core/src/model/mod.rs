//! Roster domain models.
//!
//! These types mirror the JSON shapes exchanged with the roster backend
//! (camelCase field names, ISO dates).

mod calendar;
mod day;
mod member;
mod reservation;
mod start;
mod user;

pub use calendar::{DayOverview, EntryType, PersonEntry, Stats, TimeFrame};
pub use day::{EditAction, ParticipantType, RosterDay, RosterEntry, RosterEntryType};
pub use member::{Addresses, Member};
pub use reservation::{Aircraft, Period, Reservation};
pub use start::{FormSlot, Start, StartDraft, StartForms, StartList};
pub use user::{NotificationSettings, User, UserSettings};
