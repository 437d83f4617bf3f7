use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::Notify;

/// Ordered frames a session may have queued before it counts as stalled.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Holds only the newest state snapshot; older unsent ones are overwritten.
#[derive(Debug)]
pub struct LatestFrame {
    frame: StdMutex<Option<String>>,
    notify: Notify,
}

impl LatestFrame {
    pub(crate) fn new() -> Self {
        Self {
            frame: StdMutex::new(None),
            notify: Notify::new(),
        }
    }

    pub(crate) fn store(&self, payload: String) {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload);
        self.notify.notify_one();
    }

    pub fn take_latest(&self) -> Option<String> {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub async fn wait_for_update(&self) {
        self.notify.notified().await;
    }
}

#[derive(Debug)]
pub(crate) struct SessionEntry {
    sender: Sender<String>,
    latest_state: Arc<LatestFrame>,
}

impl SessionEntry {
    pub(crate) fn open() -> (Self, Receiver<String>, Arc<LatestFrame>) {
        let (sender, receiver) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let latest_state = Arc::new(LatestFrame::new());
        let entry = Self {
            sender,
            latest_state: Arc::clone(&latest_state),
        };
        (entry, receiver, latest_state)
    }

    /// `Full` means the client stopped reading.
    pub(crate) fn send(&self, payload: String) -> Result<(), TrySendError<String>> {
        self.sender.try_send(payload)
    }

    pub(crate) fn store_state(&self, payload: String) {
        self.latest_state.store(payload);
    }
}

/// What the transport needs to pump one connection.
pub struct SessionIo {
    pub session_id: String,
    pub outbound_rx: Receiver<String>,
    pub latest_state: Arc<LatestFrame>,
}
