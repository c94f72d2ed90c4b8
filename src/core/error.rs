//! Fatal errors and their process exit codes

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a run. Everything else is a [`Diagnostic`](crate::core::model::Diagnostic).
#[derive(Debug, Error)]
pub enum PackError {
    #[error("missing required argument: --input <folder>")]
    MissingInput,

    #[error("input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("input path is not a directory: {}", .0.display())]
    InputNotDirectory(PathBuf),

    #[error("no eligible files found under {}", .0.display())]
    NoEligibleFiles(PathBuf),

    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PackError {
    pub fn exit_code(&self) -> i32 {
        match self {
            PackError::MissingInput => 1,
            PackError::InputNotFound(_) => 2,
            PackError::InputNotDirectory(_) => 3,
            PackError::NoEligibleFiles(_) => 4,
            PackError::WriteFailed { .. } => 5,
        }
    }
}

/// Exit code for any error that is not a [`PackError`]
pub const GENERIC_EXIT_CODE: i32 = 1;

/// Pick the exit code for an error bubbled up to `main`
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<PackError>())
        .map(PackError::exit_code)
        .unwrap_or(GENERIC_EXIT_CODE)
}
