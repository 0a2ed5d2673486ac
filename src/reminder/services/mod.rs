//! Reminder orchestration services.

mod reminder;

pub use reminder::{ReminderService, SweepReport};
