//! Domain model for reminders and their one-way state machine.

mod reminder;

pub use reminder::{
    ParseReminderStatusError, PersistedReminderData, Reminder, ReminderDomainError, ReminderStatus,
};
