//! Project scaffolding around the external app generator.
//!
//! Validates the project name, creates the project root and runs the
//! external generator inside it. The generator itself is an external
//! collaborator; this crate only wraps its invocation and reports its
//! exit status.

mod generator;
mod name;

use std::path::{Path, PathBuf};

pub use generator::{GeneratorInvocation, GeneratorSettings};
pub use name::{NameError, validate_project_name};

/// Scaffolding error.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// The project name was rejected.
    #[error("{0}")]
    Name(#[from] NameError),
    /// Filesystem error while preparing the project root.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The generator process could not be started.
    #[error("could not run generator command: {command}: {source}")]
    GeneratorSpawn {
        /// The rendered command line.
        command: String,
        /// The underlying spawn error.
        source: std::io::Error,
    },
    /// The generator exited with a non-zero status.
    #[error("generator command failed: {command}")]
    GeneratorFailed {
        /// The rendered command line.
        command: String,
    },
}

/// Create the project at `project_dir` and run the generator inside it.
///
/// Returns the absolute project root on success.
///
/// # Errors
///
/// Returns a [`ScaffoldError`] when the basename fails name validation, the
/// directory cannot be created, or the generator fails.
pub async fn scaffold(
    project_dir: &Path,
    settings: &GeneratorSettings,
) -> Result<PathBuf, ScaffoldError> {
    let root = std::path::absolute(project_dir)?;
    let app_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    validate_project_name(&app_name)?;

    std::fs::create_dir_all(&root)?;
    tracing::info!(root = %root.display(), "Created project root");

    GeneratorInvocation::new(settings).run(&root).await?;

    Ok(root)
}
