//! Interactive text channels for Skyline.
//!
//! Available channels:
//! - **CLI** — line-oriented terminal chat (stdin/stdout)

pub mod cli;

pub use cli::CliChannel;
