//! One-shot readiness notification.
//!
//! The producer fires [`Notifier::notify`] once, when the value exists; the
//! consumer checks [`Readiness::take`] and receives the value exactly once.

use tokio::sync::oneshot::{self, error::TryRecvError};

pub fn channel<T>() -> (Notifier<T>, Readiness<T>) {
    let (sender, receiver) = oneshot::channel();
    (
        Notifier { sender },
        Readiness {
            receiver: Some(receiver),
        },
    )
}

pub struct Notifier<T> {
    sender: oneshot::Sender<T>,
}

impl<T> Notifier<T> {
    pub fn notify(self, value: T) {
        if self.sender.send(value).is_err() {
            log::debug!("Readiness notification sent after the receiver was dropped");
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReadyState<T> {
    /// Not yet notified.
    Pending,
    /// Notified; the value is handed out only on this call.
    Ready(T),
    /// Already consumed, or the notifier was dropped without firing.
    Finished,
}

pub struct Readiness<T> {
    receiver: Option<oneshot::Receiver<T>>,
}

impl<T> Readiness<T> {
    pub fn take(&mut self) -> ReadyState<T> {
        let Some(receiver) = self.receiver.as_mut() else {
            return ReadyState::Finished;
        };

        match receiver.try_recv() {
            Ok(value) => {
                self.receiver = None;
                ReadyState::Ready(value)
            }
            Err(TryRecvError::Empty) => ReadyState::Pending,
            Err(TryRecvError::Closed) => {
                log::warn!("Readiness notifier dropped without firing");
                self.receiver = None;
                ReadyState::Finished
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_delivered_once() {
        let (notifier, mut readiness) = channel();

        assert_eq!(readiness.take(), ReadyState::Pending);
        notifier.notify(5);
        assert_eq!(readiness.take(), ReadyState::Ready(5));
        assert_eq!(readiness.take(), ReadyState::Finished);
        assert!(!readiness.is_pending());
    }

    #[test]
    fn dropped_notifier_finishes_without_value() {
        let (notifier, mut readiness) = channel::<u32>();
        drop(notifier);

        assert_eq!(readiness.take(), ReadyState::Finished);
    }
}
