//! WebSocket client wrapping the reload session.
//!
//! Owns the connection lifecycle: argument validation, the read loop feeding
//! [`ReloadSession`], the deferred hash-check re-send and the disconnect
//! notice. One connection per [`LiveReloadClient::start`] call; there is no
//! automatic reconnect.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::message::hash_check_request;
use crate::overlay::{Overlay, Reloader};
use crate::session::{FrameOutcome, ReloadSession};

/// Sentinel accepted for the hostname and port arguments of
/// [`LiveReloadClient::start`]; resolves to the client's [`Location`].
pub const FROM_LOCATION: &str = "__from-location__";

/// Delay before re-sending a hash-check request.
const HASH_CHECK_DELAY: Duration = Duration::from_millis(500);

/// Delay before the disconnect notice is logged.
const CLOSE_NOTICE_DELAY: Duration = Duration::from_secs(1);

/// Page location used to resolve sentinel hostname/port arguments.
#[derive(Clone, Debug)]
pub struct Location {
    /// Hostname of the page the client runs on.
    pub hostname: String,
    /// Port of the page the client runs on.
    pub port: u16,
}

/// Live reload client.
///
/// Holds the collaborators and the location fallback; the per-connection
/// state lives in a fresh [`ReloadSession`] for every `start` call.
pub struct LiveReloadClient<O, R> {
    location: Location,
    overlay: O,
    reloader: R,
}

impl<O: Overlay, R: Reloader> LiveReloadClient<O, R> {
    /// Create a client with the given location fallback and collaborators.
    #[must_use]
    pub fn new(location: Location, overlay: O, reloader: R) -> Self {
        Self {
            location,
            overlay,
            reloader,
        }
    }

    /// Connect to `protocol://hostname:port` and process build-status
    /// messages until the server closes the connection.
    ///
    /// Invalid arguments and connection failures are logged and abort the
    /// call; nothing is raised to the caller.
    pub async fn start(&mut self, protocol: &str, hostname: &str, port: &str) {
        let Some(url) = resolve_url(&self.location, protocol, hostname, port) else {
            return;
        };

        let (socket, _) = match connect_async(&url).await {
            Ok(connection) => connection,
            Err(err) => {
                tracing::error!(%err, url, "Could not reach the browser refresh server");
                return;
            }
        };

        tracing::info!("The browser refresh server is connected");
        self.run(socket).await;

        tokio::time::sleep(CLOSE_NOTICE_DELAY).await;
        tracing::info!(
            "It's possible the browser refresh server has disconnected. \
             You can manually refresh the page if necessary."
        );
    }

    /// Read loop for an established connection.
    async fn run(&mut self, socket: WebSocketStream<MaybeTlsStream<TcpStream>>) {
        let (mut sink, mut stream) = socket.split();

        // The writer task owns the sink; deferred hash-check tasks feed it
        // through the channel and check liveness at fire time.
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let writer = tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        });

        let mut session = ReloadSession::new();

        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    let outcome =
                        session.handle_frame(&text, &mut self.overlay, &mut self.reloader);

                    if outcome == FrameOutcome::ScheduleHashCheck {
                        // A build on the server may have been missed; ask for
                        // the latest hash again shortly.
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(HASH_CHECK_DELAY).await;
                            if !tx.is_closed() {
                                let _ = tx.send(hash_check_request());
                            }
                        });
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(%err, "Live reload transport error");
                    break;
                }
            }
        }

        // Closing the writer closes the channel, so a hash-check timer that
        // fires after disconnect skips its send.
        writer.abort();
    }
}

/// Validate the `start` arguments and render the connection URL.
///
/// Returns `None` after logging a diagnostic when any argument is invalid.
fn resolve_url(
    location: &Location,
    protocol: &str,
    hostname: &str,
    port: &str,
) -> Option<String> {
    match protocol {
        "ws" | "wss" => {}
        other => {
            tracing::error!(protocol = other, r#"Host protocol is not "ws" or "wss""#);
            return None;
        }
    }

    let hostname = if hostname == FROM_LOCATION {
        location.hostname.as_str()
    } else if hostname.is_empty() {
        tracing::error!("Hostname is not the location sentinel or a non-empty string");
        return None;
    } else {
        hostname
    };

    let port = if port == FROM_LOCATION {
        location.port
    } else {
        match port.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                tracing::error!(port, "Port is not the location sentinel or a number");
                return None;
            }
        }
    };

    Some(format!("{protocol}://{hostname}:{port}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn location() -> Location {
        Location {
            hostname: "localhost".to_owned(),
            port: 8097,
        }
    }

    #[test]
    fn test_resolve_url_explicit_arguments() {
        let url = resolve_url(&location(), "ws", "127.0.0.1", "9000");

        assert_eq!(url.as_deref(), Some("ws://127.0.0.1:9000"));
    }

    #[test]
    fn test_resolve_url_sentinels_use_location() {
        let url = resolve_url(&location(), "wss", FROM_LOCATION, FROM_LOCATION);

        assert_eq!(url.as_deref(), Some("wss://localhost:8097"));
    }

    #[test]
    fn test_resolve_url_rejects_unknown_protocol() {
        assert_eq!(resolve_url(&location(), "ftp", "localhost", "9000"), None);
    }

    #[test]
    fn test_resolve_url_rejects_empty_hostname() {
        assert_eq!(resolve_url(&location(), "ws", "", "9000"), None);
    }

    #[test]
    fn test_resolve_url_rejects_non_numeric_port() {
        assert_eq!(resolve_url(&location(), "ws", "localhost", "http"), None);
    }
}
