//! Process-wide politeness gate for outbound requests to the carrier.
//!
//! Every fee fetch enters the same gate, so the number of requests in flight
//! toward the carrier is bounded by the permit count no matter how many
//! lookups run at once or how large their pages are. After a permit is
//! granted the caller also sleeps for a random delay in
//! `0..=max_delay_ms`, spreading bursts out the way a human visitor would.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::ScraperError;

/// Cloneable handle to a shared counting semaphore plus delay policy.
///
/// Clones share the same permits.
#[derive(Debug, Clone)]
pub struct PolitenessGate {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    max_delay_ms: u64,
}

impl PolitenessGate {
    /// `max_concurrent` is raised to 1 if zero.
    #[must_use]
    pub fn new(max_concurrent: usize, max_delay_ms: u64) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            max_delay_ms,
        }
    }

    /// Waits for a permit, then for the randomized delay.
    ///
    /// The request must be made while the returned permit is alive.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::GateClosed`] if the semaphore was closed.
    pub async fn enter(&self) -> Result<OwnedSemaphorePermit, ScraperError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ScraperError::GateClosed)?;

        let delay_ms = self.next_delay_ms();
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        Ok(permit)
    }

    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Permits not currently held.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    fn next_delay_ms(&self) -> u64 {
        if self.max_delay_ms == 0 {
            return 0;
        }
        rand::rng().random_range(0..=self.max_delay_ms)
    }
}
