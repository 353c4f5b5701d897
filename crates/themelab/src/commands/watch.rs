//! `themelab watch` command implementation.
//!
//! Runs the live reload client against the dev server and renders build
//! status in the terminal: compile diagnostics through a terminal overlay,
//! successful compiles as a reload notice.

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use themelab_config::{CliSettings, Config};
use themelab_reload::{
    FROM_LOCATION, LiveReloadClient, Location, Overlay, OverlayError, Reloader,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    /// Path to configuration file (default: auto-discover themelab.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dev server protocol, ws or wss (overrides config).
    #[arg(long)]
    protocol: Option<String>,

    /// Dev server hostname (overrides config).
    #[arg(long)]
    hostname: Option<String>,

    /// Dev server port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl WatchArgs {
    /// Execute the watch command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails. Connection problems are
    /// reported by the client itself and do not fail the command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            template: None,
            protocol: self.protocol,
            hostname: self.hostname,
            port: self.port,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Watching build status on {}://{}:{}",
            config.dev_server.protocol, config.dev_server.hostname, config.dev_server.port
        ));

        let location = Location {
            hostname: config.dev_server.hostname.clone(),
            port: config.dev_server.port,
        };
        let mut client = LiveReloadClient::new(
            location,
            TerminalOverlay::new(),
            TerminalReloader::new(),
        );

        client
            .start(&config.dev_server.protocol, FROM_LOCATION, FROM_LOCATION)
            .await;

        Ok(())
    }
}

/// Overlay collaborator that renders compile diagnostics in the terminal.
struct TerminalOverlay {
    output: Output,
}

impl TerminalOverlay {
    fn new() -> Self {
        Self {
            output: Output::new(),
        }
    }
}

impl Overlay for TerminalOverlay {
    fn handle_errors(&mut self, errors: &[Value]) -> Result<(), OverlayError> {
        self.output.error(&format!("Compile errors ({}):", errors.len()));
        for error in errors {
            self.output.error(&format!("  {}", render(error)));
        }
        Ok(())
    }

    fn handle_warnings(&mut self, warnings: &[Value]) -> Result<(), OverlayError> {
        self.output
            .warning(&format!("Compile warnings ({}):", warnings.len()));
        for warning in warnings {
            self.output.warning(&format!("  {}", render(warning)));
        }
        Ok(())
    }
}

/// Reloader collaborator; in a terminal the "page reload" becomes a notice.
struct TerminalReloader {
    output: Output,
}

impl TerminalReloader {
    fn new() -> Self {
        Self {
            output: Output::new(),
        }
    }
}

impl Reloader for TerminalReloader {
    fn reload(&mut self) {
        self.output.success("New compile ready - reload your browser.");
    }
}

/// Render an opaque diagnostic descriptor for the terminal.
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_plain_string() {
        assert_eq!(render(&Value::String("boom".to_owned())), "boom");
    }

    #[test]
    fn test_render_structured_descriptor() {
        let value = serde_json::json!({ "message": "boom", "file": "src/index.js" });
        assert_eq!(render(&value), r#"{"file":"src/index.js","message":"boom"}"#);
    }
}
