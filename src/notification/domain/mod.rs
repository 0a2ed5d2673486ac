//! Domain model for per-user notifications.

mod notification;

pub use notification::{Notification, NotificationType, ParseNotificationTypeError};
