//! Status store backed by a tokio [`watch`] channel.
//!
//! There is exactly one [`StatusWriter`] (held by the controller task) and any
//! number of [`StatusReader`]s. Readers always observe a complete snapshot.

use tokio::sync::watch;

use silvanus_domain::status::Status;

/// Create a store initialised with zero values.
#[must_use]
pub fn channel() -> (StatusWriter, StatusReader) {
    let (sender, receiver) = watch::channel(Status::default());
    (StatusWriter { sender }, StatusReader { receiver })
}

/// The single write handle. Not `Clone`.
#[derive(Debug)]
pub struct StatusWriter {
    sender: watch::Sender<Status>,
}

impl StatusWriter {
    /// Replace the current snapshot.
    ///
    /// Succeeds even when no reader is left.
    pub fn publish(&self, status: Status) {
        self.sender.send_replace(status);
    }

    /// Copy of the last published snapshot.
    #[must_use]
    pub fn current(&self) -> Status {
        self.sender.borrow().clone()
    }

    /// Create an additional reader.
    #[must_use]
    pub fn reader(&self) -> StatusReader {
        StatusReader {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Read handle shared with the HTTP layer.
#[derive(Debug, Clone)]
pub struct StatusReader {
    receiver: watch::Receiver<Status>,
}

impl StatusReader {
    /// Copy of the latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Status {
        self.receiver.borrow().clone()
    }

    /// Wait until a new snapshot is published.
    ///
    /// Returns `false` once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}
