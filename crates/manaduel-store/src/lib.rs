//! Durable session store boundary for Manaduel.
//!
//! The engine persists exactly two things: the phase each session is
//! in, and the ordered list of draft picks. That is enough for a
//! crashed process or a reconnecting client to reconstruct state.
//!
//! [`SessionStore`] is the narrow interface the core requires; schema
//! and query form are the backend's business. [`MemoryStore`] is the
//! in-process reference implementation used by the server and by tests.

mod error;
mod memory;
mod status;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use status::SessionStatus;
pub use store::{DraftPickRecord, SessionStore};
