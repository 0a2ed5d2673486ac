//! Notification orchestration services.

mod notification;

pub use notification::NotificationService;
