/// Where the entry collection is persisted.
pub mod backend;
pub mod challenge_log;
pub mod journal;
mod record;

pub use backend::{Backend, JsonFile, MemoryBackend, StorageError};
pub use challenge_log::ChallengeLog;
pub use journal::{CreateError, Journal, ResolveError};
