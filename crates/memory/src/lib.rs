//! Short-term conversation memory for Skyline.
//!
//! A session keeps only the most recent turns; nothing is persisted and
//! nothing outlives the process.

pub mod session;

pub use session::SessionMemory;
