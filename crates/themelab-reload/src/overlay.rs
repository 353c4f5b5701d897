//! Collaborator traits for the live reload client.

use serde_json::Value;

/// Failure reported by an overlay collaborator.
///
/// Overlay failures are never propagated past the client; they are caught
/// and logged without affecting reload or hash bookkeeping.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct OverlayError(pub String);

/// Renders compile diagnostics without reloading the page.
pub trait Overlay {
    /// Show compile errors.
    fn handle_errors(&mut self, errors: &[Value]) -> Result<(), OverlayError>;

    /// Show compile warnings.
    fn handle_warnings(&mut self, warnings: &[Value]) -> Result<(), OverlayError>;
}

/// Performs the full page reload when a new compile lands.
pub trait Reloader {
    /// Trigger a reload.
    fn reload(&mut self);
}
