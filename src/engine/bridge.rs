// src/engine/bridge.rs
//
// Callback-to-future bridge and cooperative cancellation.
//
// A worker finishes a decode by calling CallbackBridge::resolve exactly once;
// the awaiting side holds the matching oneshot receiver. Late or repeated
// resolutions are dropped and reported as `false`.

use crate::error::SvgDecodeError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

type BridgeResult<T> = std::result::Result<T, SvgDecodeError>;

/// Single-resolution completion slot.
pub struct CallbackBridge<T> {
    sender: Mutex<Option<oneshot::Sender<BridgeResult<T>>>>,
}

impl<T> CallbackBridge<T> {
    pub fn new() -> (Self, oneshot::Receiver<BridgeResult<T>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sender: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    /// Deliver the result. Returns `false` if the bridge was already resolved
    /// or nobody is listening anymore.
    pub fn resolve(&self, result: BridgeResult<T>) -> bool {
        let Some(sender) = self.sender.lock().take() else {
            tracing::debug!("decode bridge resolved twice; dropping late result");
            return false;
        };
        sender.send(result).is_ok()
    }

    pub fn is_resolved(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// True once the receiving side is gone (future dropped).
    pub fn is_abandoned(&self) -> bool {
        match self.sender.lock().as_ref() {
            Some(sender) => sender.is_closed(),
            None => false,
        }
    }
}

/// Shared cancellation flag. Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` tagged with `stage` when cancellation was requested.
    pub fn check(&self, stage: &'static str) -> BridgeResult<()> {
        if self.is_cancelled() {
            Err(SvgDecodeError::cancelled(stage))
        } else {
            Ok(())
        }
    }
}
