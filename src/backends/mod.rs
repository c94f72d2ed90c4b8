//! Backends module - Filesystem access
//!
//! Provides:
//! - walk: Deterministic directory traversal

pub mod walk;
