//! Cancellable request slots.
//!
//! A slot holds at most one in-flight request. Starting a new request cancels
//! the previous one, and outcomes carry the generation they were started
//! under so anything that slipped into the channel before the cancel is
//! rejected by [`RequestSlot::settle`].

use async_channel::Sender;
use std::future::Future;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::FetchError;

#[derive(Debug)]
pub struct Outcome<T> {
    pub generation: u64,
    pub result: Result<T, FetchError>,
}

#[derive(Debug, Default)]
pub struct RequestSlot {
    generation: u64,
    pending: Option<CancellationToken>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels whatever is in flight and hands out a ticket for the next request.
    pub fn begin(&mut self) -> Ticket {
        self.cancel();
        self.generation += 1;
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        Ticket {
            generation: self.generation,
            token,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            debug!("cancelling request {}", self.generation);
            token.cancel();
        }
    }

    /// True if the outcome belongs to the newest request and nothing settled it yet.
    pub fn settle(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.pending.is_none() {
            debug!(
                "dropping stale outcome {} (current {})",
                generation, self.generation
            );
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct Ticket {
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs `request` on the runtime. A cancelled request sends nothing.
    pub fn spawn<T, F>(self, runtime: &Handle, request: F, outcomes: Sender<Outcome<T>>)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let Ticket { generation, token } = self;
        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("request {} cancelled", generation);
                }
                result = request => {
                    let _ = outcomes.send(Outcome { generation, result }).await;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_begin_advances_and_cancels() {
        let mut slot = RequestSlot::new();
        let first = slot.begin();
        assert!(slot.is_pending());
        let second = slot.begin();
        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert_eq!(second.generation(), first.generation() + 1);

        assert!(!slot.settle(first.generation()));
        assert!(slot.settle(second.generation()));
        assert!(!slot.is_pending());
        // settles only once
        assert!(!slot.settle(second.generation()));
    }

    #[test]
    fn test_cancel_rejects_current_generation() {
        let mut slot = RequestSlot::new();
        let ticket = slot.begin();
        slot.cancel();
        assert!(ticket.token.is_cancelled());
        assert!(!slot.settle(ticket.generation()));
    }

    #[tokio::test]
    async fn test_cancelled_request_sends_nothing() {
        let (tx, rx) = async_channel::unbounded::<Outcome<u32>>();
        let mut slot = RequestSlot::new();

        slot.begin().spawn(
            &Handle::current(),
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(1)
            },
            tx.clone(),
        );
        slot.begin().spawn(&Handle::current(), async { Ok(2) }, tx);

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.result.unwrap(), 2);
        assert!(slot.settle(outcome.generation));
        // the only sender left lives in the cancelled task, which has exited
        assert!(rx.recv().await.is_err());
    }
}
