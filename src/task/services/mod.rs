//! Task, activity and calendar orchestration services.

mod calendar;
mod task;

pub use calendar::CalendarService;
pub use task::{MoveTaskRequest, TaskService};
