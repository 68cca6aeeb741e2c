#[cfg(any(test, feature = "mock"))]
mod memory;
mod settings;
mod storage;

#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryStorage;
pub use settings::{Account, Auth, Database, Logger, Refresh, Server, Settings};
pub use storage::{RealtimeDatabase, Storage};
