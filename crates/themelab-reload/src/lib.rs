//! Live reload client for the themelab dev server.
//!
//! Maintains a persistent WebSocket connection to the development server,
//! interprets build-status messages and either triggers a page reload or
//! hands compile diagnostics to an overlay collaborator.
//!
//! # Architecture
//!
//! ```text
//! Dev server ──WebSocket──► LiveReloadClient
//!                                │
//!                                ├─► ReloadSession (hash tracking + dispatch)
//!                                │       │
//!                                │       ├─► Overlay (compile errors/warnings)
//!                                │       └─► Reloader (full page reload)
//!                                │
//!                                └─► writer task (outbound hash-check frames)
//! ```
//!
//! The session state machine is synchronous and owns no I/O, so the
//! reload/overlay semantics are unit-testable without a socket. The client
//! wraps it with the connection lifecycle: validation of the `start`
//! arguments, the read loop, the deferred hash-check re-send and the
//! disconnect notice.
//!
//! Nothing in this crate raises to its caller: configuration mistakes,
//! unparseable frames and overlay failures all degrade to log lines.

mod client;
mod message;
mod overlay;
mod session;

pub use client::{FROM_LOCATION, LiveReloadClient, Location};
pub use message::{BuildMessage, BuildStats, MessageKind};
pub use overlay::{Overlay, OverlayError, Reloader};
pub use session::{FrameOutcome, ReloadSession};
