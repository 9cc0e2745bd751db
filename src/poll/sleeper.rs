//! Pause primitive for the poller
//!
//! `TokioSleeper` can watch an `InterruptSignal`. Once raised, the signal
//! stays raised: the interrupted pause returns early, every later pause
//! returns immediately, and the owner can still observe the flag after the
//! poll finishes.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How a pause ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    /// The full duration elapsed
    Completed,
    /// The pause was cut short by an interrupt
    Interrupted,
}

/// Clock/sleep collaborator
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Pause for `duration`
    async fn sleep(&self, duration: Duration) -> SleepOutcome;
}

/// Raises the interrupt observed by an `InterruptSignal`
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl InterruptHandle {
    /// Raise the interrupt
    pub fn interrupt(&self) {
        self.sender.send_replace(true);
    }

    /// Lower the interrupt
    pub fn clear(&self) {
        self.sender.send_replace(false);
    }
}

/// Observes interrupts raised through an `InterruptHandle`
#[derive(Debug, Clone)]
pub struct InterruptSignal {
    receiver: watch::Receiver<bool>,
}

impl InterruptSignal {
    /// Create a connected handle/signal pair, initially lowered
    pub fn pair() -> (InterruptHandle, InterruptSignal) {
        let (sender, receiver) = watch::channel(false);
        (
            InterruptHandle {
                sender: Arc::new(sender),
            },
            InterruptSignal { receiver },
        )
    }

    /// Whether the interrupt is currently raised
    pub fn is_interrupted(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once the interrupt is raised; pends forever if the handle is gone
    async fn raised(&self) {
        let mut receiver = self.receiver.clone();
        let raised = receiver.wait_for(|raised| *raised).await.map(|_| ());
        if raised.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Real-time sleeper backed by `tokio::time::sleep`
#[derive(Debug, Clone, Default)]
pub struct TokioSleeper {
    interrupt: Option<InterruptSignal>,
}

impl TokioSleeper {
    /// Create a sleeper that cannot be interrupted
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sleeper that wakes early when `signal` is raised
    pub fn interruptible(signal: InterruptSignal) -> Self {
        Self {
            interrupt: Some(signal),
        }
    }
}

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) -> SleepOutcome {
        let Some(signal) = &self.interrupt else {
            tokio::time::sleep(duration).await;
            return SleepOutcome::Completed;
        };

        if signal.is_interrupted() {
            return SleepOutcome::Interrupted;
        }

        tokio::select! {
            () = tokio::time::sleep(duration) => SleepOutcome::Completed,
            () = signal.raised() => SleepOutcome::Interrupted,
        }
    }
}
