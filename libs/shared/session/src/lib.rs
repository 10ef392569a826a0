pub mod context;
pub mod store;

pub use context::{SessionContext, SessionInvalidated};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
