//! CLI error types.

use themelab_config::ConfigError;
use themelab_scaffold::ScaffoldError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Scaffold(#[from] ScaffoldError),
}
