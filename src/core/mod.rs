//! Core module - Data model and the building blocks of a pack run
//!
//! This module provides:
//! - Data model (FileReference, TraversalContext, ClassificationResult)
//! - Fatal errors and exit codes
//! - Path normalization utilities
//! - Exclude pattern matching
//! - Content classification (binary, BOM, language)
//! - File reading for assembly
//! - Rendering of dry-run listings

pub mod classify;
pub mod error;
pub mod file_reader;
pub mod matcher;
pub mod model;
pub mod paths;
pub mod render;
