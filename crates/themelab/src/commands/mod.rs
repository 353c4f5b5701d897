//! CLI command implementations.

mod new;
mod watch;

pub(crate) use new::NewArgs;
pub(crate) use watch::WatchArgs;
