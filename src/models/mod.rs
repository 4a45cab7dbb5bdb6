pub mod account;
pub mod history;
pub mod task;

pub use account::Account;
pub use history::{HistoryEntry, HistoryReport, StatusFilter};
pub use task::{Priority, Task, TaskStatus};
