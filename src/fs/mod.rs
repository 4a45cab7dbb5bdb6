pub mod backing;
pub mod history;
pub mod record;
pub mod tasks;
pub mod users;

pub use backing::{Backing, FileBacking, MemBacking};
pub use history::HistoryStore;
pub use tasks::TaskStore;
pub use users::CredentialStore;

use crate::config::Config;

/// The three file-backed stores of one deployment.
pub struct Stores {
    pub tasks: TaskStore,
    pub history: HistoryStore,
    pub credentials: CredentialStore,
}

/// Open the stores at the paths the config points at. Files are created
/// lazily on first write; a missing file reads as an empty store.
pub fn open_stores(config: &Config) -> Stores {
    Stores {
        tasks: TaskStore::open(config.tasks_path()),
        history: HistoryStore::open(config.history_path()),
        credentials: CredentialStore::open(config.users_path()),
    }
}
