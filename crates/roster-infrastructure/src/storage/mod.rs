//! Storage layer for atomic file operations.

mod atomic_toml;

pub use atomic_toml::AtomicTomlFile;
