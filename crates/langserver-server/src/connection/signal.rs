//! Disconnect signal
//!
//! A single-fire event created per connection. The connection task owns
//! the [`DisconnectNotifier`] and consumes it when it reaches a terminal
//! state; the one [`DisconnectSignal`] holder observes the outcome and may
//! ask again any number of times.

use tokio::sync::oneshot;

use langserver_domain::value_objects::ConnectionState;

/// Terminal outcome of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnect {
    /// Terminal state reached
    pub state: ConnectionState,
    /// Failure description when the connection closed on error
    pub error: Option<String>,
}

impl Disconnect {
    /// Peer closed the stream cleanly
    pub fn normal() -> Self {
        Self {
            state: ConnectionState::ClosedNormally,
            error: None,
        }
    }

    /// Connection ended on a protocol or transport failure
    pub fn failed<S: Into<String>>(error: S) -> Self {
        Self {
            state: ConnectionState::ClosedOnError,
            error: Some(error.into()),
        }
    }

    /// Notifier dropped without firing
    fn abandoned() -> Self {
        Self::failed("connection task ended without signaling")
    }

    /// Whether the connection closed on error
    pub fn is_error(&self) -> bool {
        self.state == ConnectionState::ClosedOnError
    }
}

/// Create a connected notifier/signal pair
pub fn disconnect_pair() -> (DisconnectNotifier, DisconnectSignal) {
    let (tx, rx) = oneshot::channel();
    (
        DisconnectNotifier { tx },
        DisconnectSignal {
            rx: Some(rx),
            observed: None,
        },
    )
}

/// Firing side, consumed on use
#[derive(Debug)]
pub struct DisconnectNotifier {
    tx: oneshot::Sender<Disconnect>,
}

impl DisconnectNotifier {
    /// Fire the signal
    pub fn fire(self, outcome: Disconnect) {
        // The observer may already be gone; nobody is left to tell.
        let _ = self.tx.send(outcome);
    }
}

/// Observing side
#[derive(Debug)]
pub struct DisconnectSignal {
    rx: Option<oneshot::Receiver<Disconnect>>,
    observed: Option<Disconnect>,
}

impl DisconnectSignal {
    /// Wait for the connection to terminate
    ///
    /// After the first observation the cached outcome is returned
    /// immediately. Cancel-safe. A notifier dropped without firing reads as
    /// a failure.
    pub async fn wait(&mut self) -> Disconnect {
        if let Some(outcome) = &self.observed {
            return outcome.clone();
        }

        let outcome = match self.rx.as_mut() {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Disconnect::abandoned()),
            None => Disconnect::abandoned(),
        };
        self.rx = None;
        self.observed = Some(outcome.clone());
        outcome
    }

    /// Outcome if already observed or fired, without waiting
    pub fn try_wait(&mut self) -> Option<Disconnect> {
        if self.observed.is_none() {
            let rx = self.rx.as_mut()?;
            let outcome = match rx.try_recv() {
                Ok(outcome) => outcome,
                Err(oneshot::error::TryRecvError::Empty) => return None,
                Err(oneshot::error::TryRecvError::Closed) => {
                    Disconnect::abandoned()
                }
            };
            self.rx = None;
            self.observed = Some(outcome);
        }
        self.observed.clone()
    }
}
