//! Per-connection reload state machine.
//!
//! Tracks the last known build hash and whether the connection has seen its
//! first message, and decides per inbound frame whether to reload the page,
//! hand diagnostics to the overlay, or schedule a hash-check re-send.
//!
//! The session owns no I/O. The client feeds it raw text frames and executes
//! the returned [`FrameOutcome`]; overlay and reload effects happen through
//! the collaborator traits passed into [`ReloadSession::handle_frame`].

use crate::message::{BuildMessage, MessageKind};
use crate::overlay::{Overlay, Reloader};

/// Follow-up work requested by a processed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing left to do for this frame.
    Handled,
    /// Schedule a deferred re-send of the hash-check request.
    ScheduleHashCheck,
}

/// State for a single live reload connection.
#[derive(Debug)]
pub struct ReloadSession {
    /// Last known build hash; absent until a message carries one.
    hash: Option<String>,
    /// True until the first message has been processed.
    newly_reloaded: bool,
}

impl Default for ReloadSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReloadSession {
    /// Create a session for a fresh connection.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hash(None)
    }

    /// Create a session that resumes with a known build hash.
    #[must_use]
    pub fn with_hash(hash: Option<String>) -> Self {
        Self {
            hash,
            newly_reloaded: true,
        }
    }

    /// Last known build hash.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Whether no message has been processed yet on this connection.
    #[must_use]
    pub fn is_newly_reloaded(&self) -> bool {
        self.newly_reloaded
    }

    /// Process one inbound text frame.
    ///
    /// An unparseable frame is logged and discarded without touching session
    /// state. A parsed message is dispatched by its effective kind, then the
    /// recorded hash is updated to the incoming hash (cleared when absent)
    /// and the connection stops being newly reloaded.
    pub fn handle_frame(
        &mut self,
        text: &str,
        overlay: &mut dyn Overlay,
        reloader: &mut dyn Reloader,
    ) -> FrameOutcome {
        let msg: BuildMessage = match serde_json::from_str(text) {
            Ok(msg) => msg,
            Err(err) => {
                tracing::debug!(%err, raw = text, "Discarding unparseable live reload frame");
                return FrameOutcome::Handled;
            }
        };

        let outcome = self.dispatch(&msg, overlay, reloader);

        self.hash = msg.hash().map(str::to_owned);
        self.newly_reloaded = false;

        outcome
    }

    /// Dispatch a parsed message by its effective kind.
    fn dispatch(
        &mut self,
        msg: &BuildMessage,
        overlay: &mut dyn Overlay,
        reloader: &mut dyn Reloader,
    ) -> FrameOutcome {
        match msg.effective_kind() {
            MessageKind::ContentChanged => {
                if self.should_reload_on_content_changed(msg.hash()) {
                    reloader.reload();
                }
            }
            MessageKind::Errors => {
                if let Err(err) = overlay.handle_errors(&msg.stats.errors) {
                    tracing::warn!(%err, "Overlay failed to render compile errors");
                }
            }
            MessageKind::Warnings => {
                // A compile with warnings only still produced fresh output,
                // so the reload happens even if the overlay misbehaves.
                if let Err(err) = overlay.handle_warnings(&msg.stats.warnings) {
                    tracing::warn!(%err, "Overlay failed to render compile warnings");
                }
                if !self.newly_reloaded {
                    reloader.reload();
                }
            }
            MessageKind::HashCheck => {
                if self.hash.is_none() {
                    self.hash = msg.hash().map(str::to_owned);
                    return FrameOutcome::ScheduleHashCheck;
                }
                if !self.newly_reloaded && msg.hash() != self.hash.as_deref() {
                    reloader.reload();
                }
            }
        }

        FrameOutcome::Handled
    }

    /// Reload condition for a plain `content-changed` message.
    ///
    /// Reload unless this is the very first message on the connection and the
    /// incoming hash matches the one already recorded. A successful compile
    /// always reloads on later messages; the hash comparison only guards the
    /// first message against redundant duplicate notifications.
    fn should_reload_on_content_changed(&self, incoming: Option<&str>) -> bool {
        if !self.newly_reloaded {
            return true;
        }
        match (self.hash.as_deref(), incoming) {
            (None, _) => true,
            (Some(recorded), Some(incoming)) => incoming != recorded,
            (Some(_), None) => false,
        }
    }
}
