//! Persistence core of a flat-file to-do application: credential, task and
//! history stores over pipe-delimited text files, plus the policy layer
//! around them (validation, deadline sweep, archival, completion counts).
//! The presentation layer calls into the stores and re-renders from the
//! returned snapshots; every read re-parses the backing file.

pub mod config;
pub mod error;
pub mod fs;
pub mod models;
pub mod upcoming;

pub use config::Config;
pub use error::{ArchiveError, AuthError, RegisterError, TaskError, WeakPassword};
pub use fs::{Backing, CredentialStore, FileBacking, HistoryStore, MemBacking, TaskStore};
pub use models::{Account, HistoryEntry, HistoryReport, Priority, StatusFilter, Task, TaskStatus};
