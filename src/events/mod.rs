//! Progress notifications emitted during a crawl
//!
//! The crawl runs on a dedicated worker; the controlling context observes
//! it through one-way messages rather than shared mutable state. Every
//! component receives an injected [`ProgressSink`] instead of reaching for
//! a global logger; each emitted event is also logged via `tracing` at the
//! matching level.

use std::fmt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Severity of a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// One free-text progress line with its severity
#[derive(Debug, Clone)]
pub struct CrawlEvent {
    pub severity: Severity,
    pub message: String,
}

/// Injected notification sink
///
/// Cloneable; a disabled sink drops events (the `tracing` side still
/// fires). Send failures are ignored: a caller that stopped listening
/// must not stall the crawl.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    sender: Option<UnboundedSender<CrawlEvent>>,
}

impl ProgressSink {
    /// Creates a connected sink and the receiving end for the caller.
    pub fn channel() -> (Self, UnboundedReceiver<CrawlEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    /// Creates a sink that only logs.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.send(Severity::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.send(Severity::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.send(Severity::Error, message);
    }

    fn send(&self, severity: Severity, message: String) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(CrawlEvent { severity, message });
        }
    }
}
