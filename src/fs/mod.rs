//! Filesystem utilities for carousel.
//!
//! Provides atomic file write operations used for all durable session state
//! (the store file, snapshot log, persisted images, and export archives).

mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
