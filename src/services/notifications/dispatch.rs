//! Detached execution of notification deliveries.
//!
//! A delivery runs on its own tokio task. The caller gets nothing back: no
//! handle, no result, no way to cancel. Errors and panics stop at the task
//! boundary and are logged with enough context to trace them to the record
//! that triggered them.

use std::fmt;
use std::future::Future;

use tokio::runtime::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Email => f.write_str("email"),
            Channel::Sms => f.write_str("sms"),
        }
    }
}

/// The persisted record a notification was triggered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub kind: &'static str,
    pub id: i64,
}

impl Origin {
    pub fn booking(id: i64) -> Self {
        Self { kind: "booking", id }
    }

    pub fn contact(id: i64) -> Self {
        Self { kind: "contact", id }
    }

    pub fn newsletter(id: i64) -> Self {
        Self { kind: "newsletter", id }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub channel: Channel,
    pub recipient: String,
    pub origin: Origin,
}

/// Runs `delivery` in the background and returns immediately.
pub fn spawn_detached<F>(job: Job, delivery: F)
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let Ok(runtime) = Handle::try_current() else {
        tracing::error!(
            channel = %job.channel,
            recipient = %job.recipient,
            origin = %job.origin,
            "no async runtime available, notification dropped"
        );
        return;
    };

    let unit = runtime.spawn(delivery);

    // Supervisor: observes the unit so panics get logged with context.
    runtime.spawn(async move {
        match unit.await {
            Ok(Ok(())) => {
                tracing::debug!(
                    channel = %job.channel,
                    recipient = %job.recipient,
                    origin = %job.origin,
                    "notification delivered"
                );
            }
            Ok(Err(e)) => {
                tracing::error!(
                    channel = %job.channel,
                    recipient = %job.recipient,
                    origin = %job.origin,
                    error = %format!("{e:#}"),
                    "notification failed"
                );
            }
            Err(e) if e.is_panic() => {
                tracing::error!(
                    channel = %job.channel,
                    recipient = %job.recipient,
                    origin = %job.origin,
                    "notification task panicked"
                );
            }
            Err(_) => {
                tracing::warn!(
                    channel = %job.channel,
                    recipient = %job.recipient,
                    origin = %job.origin,
                    "notification task cancelled"
                );
            }
        }
    });
}
