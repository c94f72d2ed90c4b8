//! Flows module - Operations combining the core pieces
//!
//! Provides:
//! - assemble: Render walked files into one fenced document
//! - pack: Validate input, walk, assemble and write

pub mod assemble;
pub mod pack;
