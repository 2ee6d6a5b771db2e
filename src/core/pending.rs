//! Future-like handles for work completed outside the tick loop.
//!
//! Collaborators such as the routing service and the anchor resolver answer
//! asynchronously. They hand back a [`Pending`] and complete it later through
//! the paired [`Completer`]. The tick loop checks the handle without blocking;
//! dropping the handle cancels interest in the result.

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Result of checking a [`Pending`] handle once.
#[derive(Clone, Debug, PartialEq)]
pub enum Poll<T> {
    /// The value arrived.
    Ready(T),
    /// Still in progress.
    Waiting,
    /// The producing side went away without answering.
    Abandoned,
}

/// Receiving half of an asynchronous answer.
#[derive(Debug)]
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

/// Sending half of an asynchronous answer.
#[derive(Debug)]
pub struct Completer<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Pending<T> {
    /// Create a connected completer/handle pair.
    pub fn channel() -> (Completer<T>, Pending<T>) {
        let (tx, rx) = oneshot::channel();
        (Completer { tx }, Pending { rx })
    }

    /// A handle that is already answered.
    pub fn ready(value: T) -> Self {
        let (completer, pending) = Self::channel();
        completer.complete(value);
        pending
    }

    /// Check for the answer without blocking.
    ///
    /// After `Ready` has been returned once, further polls report `Abandoned`.
    pub fn poll(&mut self) -> Poll<T> {
        match self.rx.try_recv() {
            Ok(value) => Poll::Ready(value),
            Err(TryRecvError::Empty) => Poll::Waiting,
            Err(TryRecvError::Closed) => Poll::Abandoned,
        }
    }
}

impl<T> Completer<T> {
    /// Deliver the answer. Returns `false` when the handle was already dropped.
    pub fn complete(self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Whether the waiting side has dropped its handle.
    pub fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_until_completed() {
        let (completer, mut pending) = Pending::<u32>::channel();
        assert_eq!(pending.poll(), Poll::Waiting);
        assert!(completer.complete(7));
        assert_eq!(pending.poll(), Poll::Ready(7));
    }

    #[test]
    fn ready_handle_answers_immediately() {
        let mut pending = Pending::ready("route");
        assert_eq!(pending.poll(), Poll::Ready("route"));
        assert_eq!(pending.poll(), Poll::Abandoned);
    }

    #[test]
    fn dropped_completer_abandons() {
        let (completer, mut pending) = Pending::<()>::channel();
        drop(completer);
        assert_eq!(pending.poll(), Poll::Abandoned);
    }

    #[test]
    fn dropping_handle_cancels() {
        let (completer, pending) = Pending::<u8>::channel();
        assert!(!completer.is_cancelled());
        drop(pending);
        assert!(completer.is_cancelled());
        assert!(!completer.complete(1));
    }
}
