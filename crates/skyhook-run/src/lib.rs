//! Launches the synced bundle as a child process and keeps it alive,
//! restarting it after a fixed backoff every time it exits.

pub mod supervisor;

pub use supervisor::{Supervisor, SuperviseError, RESTART_BACKOFF};
