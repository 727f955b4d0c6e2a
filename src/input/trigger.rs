//! Bounded trigger channel between background threads and the UI loop
//!
//! Sending never blocks: when a trigger is already waiting to be handled, the
//! new one is coalesced into it. The optional waker lets the sender nudge the
//! UI loop (egui repaint) so the trigger is seen promptly.

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Hotkey,
    Tray,
}

/// One request to open the popup flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub source: TriggerSource,
}

/// Result of [`TriggerSender::send`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Queued,
    /// A trigger was already pending; this one was merged into it
    Coalesced,
    /// The UI side is gone
    Closed,
}

type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct TriggerSender {
    tx: mpsc::Sender<TriggerEvent>,
    waker: Option<Waker>,
}

pub struct TriggerReceiver {
    rx: mpsc::Receiver<TriggerEvent>,
}

pub fn trigger_channel(capacity: usize) -> (TriggerSender, TriggerReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (TriggerSender { tx, waker: None }, TriggerReceiver { rx })
}

impl TriggerSender {
    /// Attach a callback run after every accepted or coalesced trigger
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn send(&self, source: TriggerSource) -> SendOutcome {
        let outcome = match self.tx.try_send(TriggerEvent { source }) {
            Ok(()) => SendOutcome::Queued,
            Err(TrySendError::Full(_)) => {
                debug!(source = ?source, "Trigger already pending, coalescing");
                SendOutcome::Coalesced
            }
            Err(TrySendError::Closed(_)) => {
                warn!(source = ?source, "Trigger channel closed, dropping trigger");
                return SendOutcome::Closed;
            }
        };

        if let Some(waker) = &self.waker {
            waker();
        }
        outcome
    }
}

impl TriggerReceiver {
    /// Next pending trigger, without blocking
    pub fn try_recv(&mut self) -> Option<TriggerEvent> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_second_trigger_is_coalesced() {
        let (tx, mut rx) = trigger_channel(1);

        assert_eq!(tx.send(TriggerSource::Hotkey), SendOutcome::Queued);
        assert_eq!(tx.send(TriggerSource::Hotkey), SendOutcome::Coalesced);

        assert_eq!(
            rx.try_recv(),
            Some(TriggerEvent {
                source: TriggerSource::Hotkey
            })
        );
        assert_eq!(rx.try_recv(), None);

        // Capacity is free again once drained
        assert_eq!(tx.send(TriggerSource::Tray), SendOutcome::Queued);
        assert_eq!(rx.try_recv().map(|e| e.source), Some(TriggerSource::Tray));
    }

    #[test]
    fn test_waker_runs_for_queued_and_coalesced() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let (tx, _rx) = trigger_channel(1);
        let tx = tx.with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tx.send(TriggerSource::Hotkey);
        tx.send(TriggerSource::Hotkey);
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_closed_receiver() {
        let (tx, rx) = trigger_channel(1);
        drop(rx);
        assert_eq!(tx.send(TriggerSource::Tray), SendOutcome::Closed);
    }

    #[test]
    fn test_sender_works_from_another_thread() {
        let (tx, mut rx) = trigger_channel(1);
        std::thread::spawn(move || tx.send(TriggerSource::Hotkey))
            .join()
            .unwrap();
        assert!(rx.try_recv().is_some());
    }
}
